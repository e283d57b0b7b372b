//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::PathBuf;

use anyhow::Result;

use crate::domain::{ContainerInspection, ContainerSpec, GuestboxConfig, SshEndpoint};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Result of a teardown call; a missing resource is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    AlreadyAbsent,
}

/// Captured result of one guest command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

// ── Container Runtime Port ────────────────────────────────────────────────────

/// Container runtime operations used by the workspace lifecycle.
#[allow(async_fn_in_trait)]
pub trait ContainerRuntime {
    /// Return the runtime version, proving the daemon is reachable.
    async fn ping(&self) -> Result<String>;
    /// Create a container from `spec` and return its id.
    async fn create(&self, spec: &ContainerSpec) -> Result<String>;
    /// Start a created or stopped container.
    async fn start(&self, container: &str) -> Result<()>;
    /// Request a graceful stop, killing the container if that fails.
    async fn stop(&self, container: &str, timeout_secs: i64) -> Result<()>;
    /// Kill the container. Killing a container that is not running succeeds.
    async fn kill(&self, container: &str) -> Result<()>;
    /// Inspect a container, returning `None` if it does not exist.
    async fn inspect(&self, container: &str) -> Result<Option<ContainerInspection>>;
    /// Remove a container and its anonymous volumes.
    async fn remove_container(&self, container: &str) -> Result<Removal>;
    /// Remove a named volume.
    async fn remove_volume(&self, volume: &str) -> Result<Removal>;
    /// Ids of all containers (running or not) matching every `key=value` label.
    async fn find_by_labels(&self, filters: &[String]) -> Result<Vec<String>>;
    /// Pull an image, reporting progress lines.
    async fn pull_image(&self, image: &str, reporter: &dyn ProgressReporter) -> Result<()>;
    /// Write container logs to the reporter, optionally following.
    async fn logs(&self, container: &str, follow: bool, reporter: &dyn ProgressReporter)
    -> Result<()>;
}

// ── Host Port Probe Port ──────────────────────────────────────────────────────

/// Checks the host's port space. No reservation outlives the call.
pub trait PortProbe {
    /// Whether `port` can be bound on the host right now.
    fn is_available(&self, port: u16) -> bool;
    /// An ephemeral port that was free at call time.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS hands out no port.
    fn ephemeral_port(&self) -> Result<u16>;
}

// ── Remote Shell Ports ────────────────────────────────────────────────────────

/// Opens remote shell sessions on the guest.
#[allow(async_fn_in_trait)]
pub trait RemoteShell {
    type Session: RemoteSession;
    /// Dial and authenticate. Failure while the guest boots is expected.
    async fn connect(&self, endpoint: &SshEndpoint) -> Result<Self::Session>;
}

/// An authenticated session. Dropping it closes the connection.
#[allow(async_fn_in_trait)]
pub trait RemoteSession {
    /// Run a shell command non-interactively and capture its output.
    async fn exec(&self, command: &str) -> Result<CommandOutput>;
}

// ── Viewer Port ───────────────────────────────────────────────────────────────

/// Opens URLs in a local viewer without waiting for it.
#[cfg_attr(test, mockall::automock)]
pub trait UrlOpener {
    /// Launch the viewer for `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if no viewer exists for this platform or it cannot be spawned.
    fn open(&self, url: &str) -> Result<()>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait; no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Mirror a raw output line (guest command output, container logs).
    fn log(&self, line: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    fn load(&self) -> Result<GuestboxConfig>;
    /// Persist the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save(&self, config: &GuestboxConfig) -> Result<()>;
    /// Location of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}
