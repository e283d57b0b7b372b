//! Remote runtime socket forwarded to a local unix socket by the system
//! OpenSSH client (`ssh -L`).
//!
//! Key and agent authentication are used as-is. A configured password is
//! answered through `SSH_ASKPASS`, pointing back at this binary.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use guestbox_common::TargetConfigOptions;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{debug, trace};

/// Set only on the `ssh` child; holds the password it asks for.
pub const ASKPASS_SECRET_ENV: &str = "GUESTBOX_ASKPASS_SECRET";

const SSH_PROGRAM: &str = "ssh";
const READY_POLL: Duration = Duration::from_millis(100);
const READY_TIMEOUT: Duration = Duration::from_secs(30);

/// Password to print when this process was started as an askpass helper.
#[must_use]
pub fn askpass_reply() -> Option<String> {
    std::env::var(ASKPASS_SECRET_ENV).ok()
}

/// A running forward. The `ssh` process is killed and the local socket
/// removed on drop.
pub struct SshTunnel {
    child: Child,
    socket: PathBuf,
    host: String,
}

impl SshTunnel {
    /// Forward the target's runtime socket and wait until the local end exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is not an SSH target, `ssh` cannot be
    /// spawned, or the forward does not come up.
    pub async fn open(options: &TargetConfigOptions) -> Result<Self> {
        open_with(SSH_PROGRAM, options, local_socket_path(), READY_TIMEOUT).await
    }

    /// Local end of the forward.
    #[must_use]
    pub fn socket_path(&self) -> &Path {
        &self.socket
    }

    async fn wait_ready(&mut self, timeout: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if let Some(status) = self.child.try_wait().context("cannot poll ssh")? {
                let mut detail = String::new();
                if let Some(mut stderr) = self.child.stderr.take() {
                    let _ = stderr.read_to_string(&mut detail).await;
                }
                bail!(
                    "SSH tunnel to {} exited ({status}): {}",
                    self.host,
                    detail.trim()
                );
            }
            if self.socket.exists() {
                debug!(host = self.host.as_str(), socket = %self.socket.display(), "SSH tunnel up");
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                bail!(
                    "SSH tunnel to {} not ready after {}s",
                    self.host,
                    timeout.as_secs()
                );
            }
            tokio::time::sleep(READY_POLL).await;
        }
    }
}

impl Drop for SshTunnel {
    fn drop(&mut self) {
        if let Err(e) = self.child.start_kill() {
            trace!(host = self.host.as_str(), error = %e, "ssh already gone");
        }
        remove_socket(&self.socket);
    }
}

fn remove_socket(path: &Path) {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
            trace!(socket = %path.display(), error = %e, "cannot remove tunnel socket");
        }
        _ => {}
    }
}

fn local_socket_path() -> PathBuf {
    dirs::runtime_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(format!("guestbox-{}.sock", std::process::id()))
}

/// `ssh` arguments forwarding `local_socket` to the remote runtime socket.
fn tunnel_args(options: &TargetConfigOptions, local_socket: &Path) -> Result<Vec<String>> {
    let host = options
        .ssh_host()
        .context("target is not reached over SSH")?;
    let user = options
        .remote_user
        .as_deref()
        .with_context(|| format!("remote target {host} has no remote user"))?;

    let mut args: Vec<String> = [
        "-nNT",
        "-o",
        "ExitOnForwardFailure=yes",
        "-o",
        "StrictHostKeyChecking=no",
        "-o",
        "UserKnownHostsFile=/dev/null",
        "-o",
        "LogLevel=ERROR",
        "-o",
        "StreamLocalBindUnlink=yes",
    ]
    .map(String::from)
    .to_vec();
    args.push("-p".to_string());
    args.push(options.ssh_port().to_string());
    if let Some(key) = &options.remote_private_key {
        args.push("-i".to_string());
        args.push(key.clone());
    }
    if options.remote_password.is_none() {
        // Never prompt on the terminal.
        args.push("-o".to_string());
        args.push("BatchMode=yes".to_string());
    }
    args.push("-L".to_string());
    args.push(format!("{}:{}", local_socket.display(), options.sock_path));
    args.push(format!("{user}@{host}"));
    Ok(args)
}

async fn open_with(
    program: &str,
    options: &TargetConfigOptions,
    socket: PathBuf,
    ready_timeout: Duration,
) -> Result<SshTunnel> {
    let args = tunnel_args(options, &socket)?;
    let host = options.ssh_host().unwrap_or_default().to_string();
    remove_socket(&socket);

    let mut command = Command::new(program);
    command
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(password) = &options.remote_password {
        let helper = std::env::current_exe().context("cannot locate guestbox for SSH askpass")?;
        command
            .env("SSH_ASKPASS", helper)
            .env("SSH_ASKPASS_REQUIRE", "force")
            .env(ASKPASS_SECRET_ENV, password);
    }
    let child = command
        .spawn()
        .with_context(|| format!("failed to spawn {program}"))?;
    debug!(host = host.as_str(), port = options.ssh_port(), "opening SSH tunnel");

    let mut tunnel = SshTunnel {
        child,
        socket,
        host,
    };
    tunnel.wait_ready(ready_timeout).await?;
    Ok(tunnel)
}
