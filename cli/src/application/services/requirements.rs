//! Application service: host requirement checks for `guestbox doctor`.

use serde::Serialize;

use crate::application::ports::{ContainerRuntime, PortProbe};
use crate::domain::port_plan::HOST_SSH_PORT;

/// One requirement and whether the host meets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementStatus {
    pub name: String,
    pub met: bool,
    pub reason: String,
}

impl RequirementStatus {
    #[must_use]
    pub fn met(name: &str, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            met: true,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn unmet(name: &str, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            met: false,
            reason: reason.into(),
        }
    }
}

pub const RUNTIME_CONFIGURED: &str = "Container runtime configured";
pub const RUNTIME_RUNNING: &str = "Container runtime running";
pub const SSH_PORT_FREE: &str = "Guest SSH port free";

/// Check a connected runtime and the host port space.
///
/// Never fails: every problem becomes an unmet requirement.
pub async fn check_requirements(
    runtime: &impl ContainerRuntime,
    probe: &impl PortProbe,
) -> Vec<RequirementStatus> {
    let mut results = vec![RequirementStatus::met(
        RUNTIME_CONFIGURED,
        "Container runtime client created",
    )];

    results.push(match runtime.ping().await {
        Ok(version) => {
            RequirementStatus::met(RUNTIME_RUNNING, format!("Container runtime {version} is running"))
        }
        Err(e) => RequirementStatus::unmet(
            RUNTIME_RUNNING,
            format!("Container runtime is not running. Error: {e:#}"),
        ),
    });

    results.push(if probe.is_available(HOST_SSH_PORT) {
        RequirementStatus::met(SSH_PORT_FREE, format!("Host port {HOST_SSH_PORT} is free"))
    } else {
        RequirementStatus::unmet(
            SSH_PORT_FREE,
            format!("Host port {HOST_SSH_PORT} is in use; a workspace may already be running"),
        )
    });

    results
}
