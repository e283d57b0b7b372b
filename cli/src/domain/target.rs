//! Resolved connection capability for a workspace operation.
//!
//! Produced once from the target options and the workspace, then consumed
//! uniformly so lifecycle code never branches on option fields.

use std::time::Duration;

use guestbox_common::{TargetConfigOptions, Workspace};

/// Host used to reach published ports on a local target.
pub const LOCAL_HOST: &str = "localhost";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub is_local: bool,
    /// Remote hostname; `None` for local targets.
    pub hostname: Option<String>,
    /// Publish the out-of-band control channel port.
    pub wants_control_channel: bool,
}

impl ResolvedTarget {
    #[must_use]
    pub fn resolve(options: &TargetConfigOptions, workspace: &Workspace) -> Self {
        let is_local = options.is_local();
        Self {
            is_local,
            hostname: options.remote_hostname.clone(),
            wants_control_channel: is_local && workspace.runs_on_local_runner(),
        }
    }

    /// Host through which published container ports are reached.
    #[must_use]
    pub fn address_host(&self) -> &str {
        self.hostname.as_deref().unwrap_or(LOCAL_HOST)
    }

    /// URL of the guest web desktop on `port`.
    #[must_use]
    pub fn ui_url(&self, port: u16) -> String {
        format!("http://{}:{port}", self.address_host())
    }

    #[must_use]
    pub fn ssh_endpoint(&self, port: u16, credentials: &GuestCredentials) -> SshEndpoint {
        SshEndpoint {
            host: self.address_host().to_string(),
            port,
            username: credentials.username.clone(),
            password: credentials.password.clone(),
            connect_timeout: credentials.connect_timeout,
        }
    }
}

/// Fixed guest login used for every remote shell session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestCredentials {
    pub username: String,
    pub password: String,
    pub connect_timeout: Duration,
}

/// Where and how to open a remote shell on the guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshEndpoint {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub connect_timeout: Duration,
}
