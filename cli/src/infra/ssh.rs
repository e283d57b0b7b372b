//! Remote shell over SSH (`ssh2`), driven from `spawn_blocking`.
//!
//! Password authentication only. Host keys are not verified: the guest is
//! created by this tool and reached through a published local port.

use std::io::Read;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use anyhow::{Context, Result};
use ssh2::Session;
use tracing::{debug, trace};

use crate::application::ports::{CommandOutput, RemoteSession, RemoteShell};
use crate::domain::target::SshEndpoint;

/// Production `RemoteShell`.
pub struct Ssh2Shell;

/// An authenticated session; disconnects on drop.
pub struct Ssh2Session {
    session: Session,
    host: String,
}

fn timeout_millis(timeout: Duration) -> u32 {
    u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX)
}

fn open(endpoint: &SshEndpoint) -> Result<Session> {
    let addr = (endpoint.host.as_str(), endpoint.port)
        .to_socket_addrs()
        .with_context(|| format!("cannot resolve {}", endpoint.host))?
        .next()
        .with_context(|| format!("no address for {}", endpoint.host))?;
    let tcp = TcpStream::connect_timeout(&addr, endpoint.connect_timeout)
        .with_context(|| format!("cannot connect to {addr}"))?;

    let mut session = Session::new().context("cannot create SSH session")?;
    session.set_tcp_stream(tcp);
    session.set_timeout(timeout_millis(endpoint.connect_timeout));
    session.handshake().context("SSH handshake failed")?;
    session
        .userauth_password(&endpoint.username, &endpoint.password)
        .with_context(|| format!("SSH login as {} failed", endpoint.username))?;
    anyhow::ensure!(session.authenticated(), "SSH login as {} rejected", endpoint.username);
    // Commands may run for a long time once the session is up.
    session.set_timeout(0);
    Ok(session)
}

/// Read a stream to its end, replacing invalid UTF-8.
fn read_lossy(mut reader: impl Read) -> std::io::Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Run `command` on a fresh channel. Stderr is merged into stdout so a
/// chatty stderr cannot fill the channel window while stdout is drained.
fn run(session: &Session, command: &str) -> Result<CommandOutput> {
    let mut channel = session
        .channel_session()
        .context("cannot open SSH channel")?;
    channel
        .handle_extended_data(ssh2::ExtendedData::Merge)
        .context("cannot merge command streams")?;
    channel.exec(command).context("cannot start command")?;

    let stdout = read_lossy(&mut channel).context("cannot read command output")?;
    channel.wait_close().context("cannot close SSH channel")?;
    let status = channel.exit_status().context("no exit status")?;

    Ok(CommandOutput {
        status,
        stdout,
        stderr: String::new(),
    })
}

impl RemoteShell for Ssh2Shell {
    type Session = Ssh2Session;

    async fn connect(&self, endpoint: &SshEndpoint) -> Result<Ssh2Session> {
        let target = endpoint.clone();
        let session = tokio::task::spawn_blocking(move || open(&target))
            .await
            .map_err(|e| anyhow::anyhow!("spawn_blocking panicked: {e}"))??;
        debug!(host = endpoint.host.as_str(), port = endpoint.port, "SSH session open");
        Ok(Ssh2Session {
            session,
            host: endpoint.host.clone(),
        })
    }
}

impl RemoteSession for Ssh2Session {
    async fn exec(&self, command: &str) -> Result<CommandOutput> {
        let session = self.session.clone();
        let owned = command.to_string();
        let output = tokio::task::spawn_blocking(move || run(&session, &owned))
            .await
            .map_err(|e| anyhow::anyhow!("spawn_blocking panicked: {e}"))??;
        trace!(host = self.host.as_str(), command, status = output.status, "command finished");
        Ok(output)
    }
}

impl Drop for Ssh2Session {
    fn drop(&mut self) {
        if let Err(e) = self.session.disconnect(None, "closing", None) {
            trace!(host = self.host.as_str(), error = %e, "SSH disconnect failed");
        }
    }
}
