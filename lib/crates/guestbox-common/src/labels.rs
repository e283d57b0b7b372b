//! Container label keys shared with the host orchestrator.
//!
//! Labels are the only durable link between a workspace and its container;
//! the orchestrator and the provider both look containers up by them.

/// Label carrying the id of the target the workspace belongs to.
pub const TARGET_ID_LABEL: &str = "daytona.target.id";

/// Label carrying the workspace id.
pub const WORKSPACE_ID_LABEL: &str = "daytona.workspace.id";

/// Label carrying the source repository URL.
pub const REPOSITORY_URL_LABEL: &str = "daytona.workspace.repository.url";

/// Label carrying the host port mapped to the guest control channel.
/// Only set when that port was allocated.
pub const TOOLBOX_HOST_PORT_LABEL: &str = "daytona.toolbox.api.hostPort";

/// Runner id used by the orchestrator for the runner embedded in the host.
pub const LOCAL_RUNNER_ID: &str = "local";
