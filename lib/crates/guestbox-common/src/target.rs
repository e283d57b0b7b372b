//! Connection options for the container runtime that hosts workspaces.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default path of the local container runtime socket.
pub const DEFAULT_SOCK_PATH: &str = "/var/run/docker.sock";

/// Errors produced while validating target options.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetOptionsError {
    #[error("docker host '{0}' must start with tcp://, http:// or unix://")]
    UnsupportedDockerHost(String),

    #[error("remote port must be non-zero")]
    InvalidRemotePort,

    #[error("remote hostname must not be empty")]
    EmptyHostname,

    #[error("remote target '{0}' needs a remote user")]
    MissingRemoteUser(String),
}

/// Port the remote host's SSH server listens on unless configured.
pub const DEFAULT_REMOTE_SSH_PORT: u16 = 22;

/// Resolved connection parameters for a target.
///
/// A target is local when no remote hostname is configured. Immutable once
/// loaded; every operation borrows it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TargetConfigOptions {
    /// Unix socket of the local runtime.
    pub sock_path: String,
    /// Runtime endpoint URL for remote daemons (`tcp://host:2375`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_private_key: Option<String>,
}

impl Default for TargetConfigOptions {
    fn default() -> Self {
        Self {
            sock_path: DEFAULT_SOCK_PATH.to_string(),
            docker_host: None,
            remote_hostname: None,
            remote_port: None,
            remote_user: None,
            remote_password: None,
            remote_private_key: None,
        }
    }
}

impl TargetConfigOptions {
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.remote_hostname.is_none()
    }

    /// Remote host reached over SSH: a remote hostname with no explicit
    /// `docker_host` endpoint.
    #[must_use]
    pub fn ssh_host(&self) -> Option<&str> {
        match (&self.remote_hostname, &self.docker_host) {
            (Some(host), None) => Some(host.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn ssh_port(&self) -> u16 {
        self.remote_port.unwrap_or(DEFAULT_REMOTE_SSH_PORT)
    }

    /// Check the options for values no connection could be built from.
    pub fn validate(&self) -> Result<(), TargetOptionsError> {
        if let Some(host) = &self.docker_host
            && !["tcp://", "http://", "unix://"]
                .iter()
                .any(|scheme| host.starts_with(scheme))
        {
            return Err(TargetOptionsError::UnsupportedDockerHost(host.clone()));
        }
        if self.remote_port == Some(0) {
            return Err(TargetOptionsError::InvalidRemotePort);
        }
        if self
            .remote_hostname
            .as_deref()
            .is_some_and(|h| h.trim().is_empty())
        {
            return Err(TargetOptionsError::EmptyHostname);
        }
        if let Some(host) = self.ssh_host()
            && self
                .remote_user
                .as_deref()
                .is_none_or(|u| u.trim().is_empty())
        {
            return Err(TargetOptionsError::MissingRemoteUser(host.to_string()));
        }
        Ok(())
    }
}
