//! Loads the workspace description handed over by the orchestrator.

use std::path::Path;

use anyhow::{Context, Result};
use guestbox_common::Workspace;

use crate::domain::workspace::{container_name, validate_container_name};

/// Environment variable naming the workspace file.
pub const WORKSPACE_ENV: &str = "GUESTBOX_WORKSPACE";

/// Read and validate a workspace JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or its ids would
/// produce an invalid container name.
pub fn load_workspace(path: &Path) -> Result<Workspace> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read workspace file {}", path.display()))?;
    let workspace: Workspace = serde_json::from_str(&content)
        .with_context(|| format!("cannot parse workspace file {}", path.display()))?;
    validate_container_name(&container_name(&workspace))?;
    Ok(workspace)
}
