use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Source repository a workspace was created from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

/// Reference to the target configuration a workspace was provisioned with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TargetConfigRef {
    pub name: String,
    /// Runner executing provider calls for this target.
    #[serde(default = "default_runner_id")]
    pub runner_id: String,
}

impl Default for TargetConfigRef {
    fn default() -> Self {
        Self {
            name: "local".to_string(),
            runner_id: default_runner_id(),
        }
    }
}

fn default_runner_id() -> String {
    crate::LOCAL_RUNNER_ID.to_string()
}

/// A single provisioned guest instance, as handed over by the orchestrator.
///
/// The provider only reads workspaces; it never mutates or persists them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    pub target_id: String,
    pub name: String,
    #[serde(default)]
    pub repository: Repository,
    /// Environment applied to the container and to the guest user profile.
    #[serde(default)]
    pub env_vars: BTreeMap<String, String>,
    #[serde(default)]
    pub target_config: TargetConfigRef,
}

impl Workspace {
    /// True when provider calls for this workspace run on the host's own runner.
    #[must_use]
    pub fn runs_on_local_runner(&self) -> bool {
        self.target_config.runner_id == crate::LOCAL_RUNNER_ID
    }
}
