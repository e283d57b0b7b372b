//! Post-boot guest configuration commands.

use std::collections::BTreeMap;

use crate::domain::config::GuestSettings;

/// Persist one environment variable for the guest user.
#[must_use]
pub fn setx_command(key: &str, value: &str) -> String {
    format!("setx {key} \"{value}\"")
}

/// One `setx` per workspace environment variable, in key order.
#[must_use]
pub fn env_commands(env_vars: &BTreeMap<String, String>) -> Vec<String> {
    env_vars
        .iter()
        .map(|(key, value)| setx_command(key, value))
        .collect()
}

/// Fixed profile commands: home directory and PATH augmentation.
#[must_use]
pub fn profile_commands(settings: &GuestSettings) -> Vec<String> {
    vec![
        setx_command("HOME", &settings.home_dir),
        format!("setx /M PATH \"%PATH%;{}\"", settings.extra_path),
    ]
}
