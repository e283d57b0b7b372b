//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed document on
//! stdout: the command result, or an error object when the command fails.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::error::{ConfigError, GuestError, LifecycleError, PortError};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Stable machine-readable code for an error chain.
#[must_use]
pub fn error_code(error: &anyhow::Error) -> &'static str {
    for cause in error.chain() {
        if let Some(e) = cause.downcast_ref::<LifecycleError>() {
            return match e {
                LifecycleError::ContainerCrashed { .. } => "GUEST_CRASHED",
                LifecycleError::ContainerExited(_) => "CONTAINER_EXITED",
                LifecycleError::ContainerNotFound(_) => "NOT_FOUND",
                LifecycleError::WaitExhausted { .. } => "TIMEOUT",
                LifecycleError::TeardownFailed { .. } => "TEARDOWN_FAILED",
            };
        }
        if cause.is::<PortError>() {
            return "PORT_UNAVAILABLE";
        }
        if cause.is::<GuestError>() {
            return "GUEST_COMMAND_FAILED";
        }
        if cause.is::<ConfigError>() {
            return "INVALID_CONFIG";
        }
    }
    "ERROR"
}

/// Renders command results as JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// Print any serializable value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!(
            "{}",
            serde_json::to_string_pretty(value).context("JSON serialization failed")?
        );
        Ok(())
    }
}
