//! Local URL viewer: the host OS default opener, spawned and never joined.

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::debug;

use crate::application::ports::UrlOpener;

/// Production `UrlOpener`.
pub struct SystemUrlOpener;

/// Program and leading arguments that open a URL on `os`.
fn opener_for(os: &str) -> Option<(&'static str, &'static [&'static str])> {
    match os {
        "windows" => Some(("rundll32", &["url.dll,FileProtocolHandler"])),
        "macos" => Some(("open", &[])),
        "linux" => Some(("xdg-open", &[])),
        _ => None,
    }
}

impl UrlOpener for SystemUrlOpener {
    fn open(&self, url: &str) -> Result<()> {
        let os = std::env::consts::OS;
        let (program, args) =
            opener_for(os).with_context(|| format!("unsupported platform: {os}"))?;
        let mut child = Command::new(program)
            .args(args)
            .arg(url)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .with_context(|| format!("cannot launch {program}"))?;

        let url = url.to_string();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => debug!(program, %status, url = url.as_str(), "viewer exited"),
                Err(e) => debug!(program, error = %e, url = url.as_str(), "viewer wait failed"),
            }
        });
        Ok(())
    }
}
