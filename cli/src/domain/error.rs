//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Lifecycle errors ──────────────────────────────────────────────────────────

/// Errors raised by the workspace lifecycle controller and boot-wait.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("container exited with error (exit code {exit_code}): {error}")]
    ContainerCrashed { exit_code: i64, error: String },

    #[error("container '{0}' exited before it was running")]
    ContainerExited(String),

    #[error("container '{0}' not found. Run 'guestbox create' first.")]
    ContainerNotFound(String),

    #[error("gave up waiting for {what} after {attempts} attempts")]
    WaitExhausted { what: String, attempts: u32 },

    #[error("failed to remove workspace: container: {container}; volume: {volume}")]
    TeardownFailed { container: String, volume: String },
}

// ── Port errors ───────────────────────────────────────────────────────────────

/// Errors raised while planning host port bindings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PortError {
    #[error("host port {0} is already in use")]
    RequiredPortInUse(u16),

    #[error("no free host port found in {attempts} ports starting at {start}")]
    ScanExhausted { start: u16, attempts: u16 },

    #[error("no free ephemeral port available: {0}")]
    NoEphemeralPort(String),
}

// ── Guest errors ──────────────────────────────────────────────────────────────

/// Errors raised by commands executed inside the guest.
#[derive(Debug, Error)]
pub enum GuestError {
    #[error("guest command `{command}` exited with status {status}: {output}")]
    CommandFailed {
        command: String,
        status: i32,
        output: String,
    },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid target options: {0}")]
    Target(#[from] guestbox_common::TargetOptionsError),

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}
