//! Workspace naming, labels, and identity validation.
//!
//! This module is intentionally free of I/O, async, and external layer imports.
//! All functions take data in and return data out.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use anyhow::Result;
use guestbox_common::{
    REPOSITORY_URL_LABEL, TARGET_ID_LABEL, TOOLBOX_HOST_PORT_LABEL, WORKSPACE_ID_LABEL, Workspace,
};
use regex::Regex;

/// Names the container runtime accepts for containers and volumes.
static CONTAINER_NAME_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_.-]*$"));

/// Deterministic container name for a workspace: `<targetId>-<workspaceId>`.
#[must_use]
pub fn container_name(workspace: &Workspace) -> String {
    format!("{}-{}", workspace.target_id, workspace.id)
}

/// Name of the volume that belongs to the workspace container.
#[must_use]
pub fn volume_name(workspace: &Workspace) -> String {
    container_name(workspace)
}

/// Check that a derived container name is acceptable to the runtime.
///
/// # Errors
///
/// Returns an error if the ids produce a name the runtime would reject.
pub fn validate_container_name(name: &str) -> Result<()> {
    let re = CONTAINER_NAME_RE
        .as_ref()
        .map_err(|e| anyhow::anyhow!("container name pattern: {e}"))?;
    anyhow::ensure!(
        re.is_match(name),
        "invalid container name '{name}': target and workspace ids may only contain letters, digits, '_', '.' and '-'"
    );
    Ok(())
}

/// Labels attached to the workspace container.
#[must_use]
pub fn container_labels(
    workspace: &Workspace,
    toolbox_host_port: Option<u16>,
) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::from([
        (TARGET_ID_LABEL.to_string(), workspace.target_id.clone()),
        (WORKSPACE_ID_LABEL.to_string(), workspace.id.clone()),
        (
            REPOSITORY_URL_LABEL.to_string(),
            workspace.repository.url.clone(),
        ),
    ]);
    if let Some(port) = toolbox_host_port {
        labels.insert(TOOLBOX_HOST_PORT_LABEL.to_string(), port.to_string());
    }
    labels
}

/// `key=value` label filters identifying the workspace container.
#[must_use]
pub fn label_filters(workspace: &Workspace) -> Vec<String> {
    vec![
        format!("{TARGET_ID_LABEL}={}", workspace.target_id),
        format!("{WORKSPACE_ID_LABEL}={}", workspace.id),
    ]
}
