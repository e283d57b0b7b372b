//! Domain types and validators for guestbox configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::time::Duration;

use anyhow::Result;
use guestbox_common::TargetConfigOptions;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::retry::RetryPolicy;
use crate::domain::target::GuestCredentials;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.guestbox/config.yaml`.
///
/// Loaded once per invocation and borrowed by every operation.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GuestboxConfig {
    /// Container runtime connection.
    pub target: TargetConfigOptions,
    /// Guest image and login.
    pub guest: GuestSettings,
    /// Poll intervals and wait bounds.
    pub timing: TimingSettings,
}

/// Guest image, credentials, and profile settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GuestSettings {
    pub image: String,
    pub username: String,
    pub password: String,
    /// Home directory exported to the guest user profile.
    pub home_dir: String,
    /// Directory appended to the machine PATH.
    pub extra_path: String,
    /// Command requesting a graceful guest power-off.
    pub shutdown_command: String,
}

impl Default for GuestSettings {
    fn default() -> Self {
        Self {
            image: "rutik7066/daytona-windows-container:latest".to_string(),
            username: "daytona".to_string(),
            password: "daytona".to_string(),
            home_dir: r"C:\Users\daytona".to_string(),
            extra_path: r"C:\Program Files\Git\bin".to_string(),
            shutdown_command: "sudo shutdown -h now".to_string(),
        }
    }
}

/// Intervals are in seconds unless the field name says otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimingSettings {
    pub boot_poll_interval_secs: u64,
    /// Overall boot-wait budget; `None` waits until the guest answers or crashes.
    pub boot_timeout_secs: Option<u64>,
    pub ssh_connect_timeout_secs: u64,
    pub running_poll_interval_secs: u64,
    pub running_poll_attempts: u32,
    pub stop_drain_delay_secs: u64,
    pub stop_drain_interval_ms: u64,
    pub stop_drain_attempts: u32,
    pub ui_port_scan_limit: u16,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            boot_poll_interval_secs: 5,
            boot_timeout_secs: Some(7200),
            ssh_connect_timeout_secs: 5,
            running_poll_interval_secs: 1,
            running_poll_attempts: 120,
            stop_drain_delay_secs: 2,
            stop_drain_interval_ms: 500,
            stop_drain_attempts: 6,
            ui_port_scan_limit: 100,
        }
    }
}

impl GuestboxConfig {
    /// Validate values no operation could run with.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        self.target.validate().map_err(ConfigError::from)?;
        if self.guest.image.trim().is_empty() {
            return Err(invalid("guest.image", "must not be empty"));
        }
        if self.guest.username.trim().is_empty() {
            return Err(invalid("guest.username", "must not be empty"));
        }
        if self.timing.boot_poll_interval_secs == 0 {
            return Err(invalid("timing.boot_poll_interval_secs", "must be positive"));
        }
        if self.timing.ssh_connect_timeout_secs == 0 {
            return Err(invalid("timing.ssh_connect_timeout_secs", "must be positive"));
        }
        if self.timing.ui_port_scan_limit == 0 {
            return Err(invalid("timing.ui_port_scan_limit", "must be positive"));
        }
        Ok(())
    }

    #[must_use]
    pub fn credentials(&self) -> GuestCredentials {
        GuestCredentials {
            username: self.guest.username.clone(),
            password: self.guest.password.clone(),
            connect_timeout: Duration::from_secs(self.timing.ssh_connect_timeout_secs),
        }
    }

    /// Boot-wait: sleep one interval before every check.
    #[must_use]
    pub fn boot_policy(&self) -> RetryPolicy {
        let interval = Duration::from_secs(self.timing.boot_poll_interval_secs);
        RetryPolicy::within(
            interval,
            self.timing.boot_timeout_secs.map(Duration::from_secs),
        )
        .with_initial_delay(interval)
    }

    /// Wait for the runtime to report a freshly started container running.
    #[must_use]
    pub fn running_policy(&self) -> RetryPolicy {
        RetryPolicy::bounded(
            Duration::from_secs(self.timing.running_poll_interval_secs),
            self.timing.running_poll_attempts,
        )
    }

    /// Reconnect loop after a failed graceful stop.
    #[must_use]
    pub fn stop_drain_policy(&self) -> RetryPolicy {
        RetryPolicy::bounded(
            Duration::from_millis(self.timing.stop_drain_interval_ms),
            self.timing.stop_drain_attempts,
        )
        .with_initial_delay(Duration::from_secs(self.timing.stop_drain_delay_secs))
    }
}

fn invalid(key: &str, reason: &str) -> anyhow::Error {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

// ── Unit tests ───────────────────────────────────────────────────────────────
