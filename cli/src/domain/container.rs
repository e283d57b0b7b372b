//! Container specification and observed container state.
//!
//! Pure data: the infra adapter translates these to runtime API types.

use std::collections::BTreeMap;

use guestbox_common::Workspace;

use crate::domain::port_plan::{GUEST_SSH_PORT, GUEST_UI_PORT, PortBindingSet};
use crate::domain::workspace::{container_labels, container_name};

/// Seconds the runtime waits for a graceful stop before killing.
/// Guest shutdown is slow, so this is generous.
pub const STOP_TIMEOUT_SECS: i64 = 120;

/// Exit codes of a process ended by SIGKILL or SIGTERM.
pub const STOP_SIGNAL_EXIT_CODES: &[i64] = &[137, 143];

/// Alias making the host reachable from inside the container.
pub const HOST_GATEWAY_ALIAS: &str = "host.docker.internal:host-gateway";

/// Device nodes passed through for hardware virtualization and tunneling.
pub const PASSTHROUGH_DEVICES: &[&str] = &["/dev/kvm", "/dev/net/tun"];

/// Capabilities the guest hypervisor needs.
pub const ADDED_CAPABILITIES: &[&str] = &["NET_ADMIN", "SYS_ADMIN"];

/// Init wrapper and guest entry script.
pub const ENTRYPOINT: &[&str] = &["/usr/bin/tini", "-s", "/run/entry.sh"];

/// Hypervisor arguments forwarding guest SSH, control, and toolbox ports.
const HYPERVISOR_ARGUMENTS: &str = "-device e1000,netdev=net0  -netdev user,id=net0,hostfwd=tcp::22-:22,hostfwd=tcp::2222-:2222,hostfwd=tcp::2280-:2280";

/// Everything needed to create the workspace container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    pub hostname: String,
    pub user: String,
    pub entrypoint: Vec<String>,
    pub env: Vec<String>,
    pub labels: BTreeMap<String, String>,
    pub ports: PortBindingSet,
    pub privileged: bool,
    pub cap_add: Vec<String>,
    /// Host device paths, mapped to the same path in the container.
    pub devices: Vec<String>,
    pub extra_hosts: Vec<String>,
    pub stop_timeout_secs: i64,
}

/// Build the container spec for a workspace and its allocated ports.
#[must_use]
pub fn build_container_spec(
    workspace: &Workspace,
    image: &str,
    ports: PortBindingSet,
) -> ContainerSpec {
    let mut env = vec![format!("ARGUMENTS={HYPERVISOR_ARGUMENTS}")];
    env.extend(
        workspace
            .env_vars
            .iter()
            .map(|(key, value)| format!("{key}={value}")),
    );

    ContainerSpec {
        name: container_name(workspace),
        image: image.to_string(),
        hostname: workspace.id.clone(),
        user: "root".to_string(),
        entrypoint: ENTRYPOINT.iter().map(ToString::to_string).collect(),
        env,
        labels: container_labels(workspace, ports.toolbox),
        ports,
        privileged: true,
        cap_add: ADDED_CAPABILITIES.iter().map(ToString::to_string).collect(),
        devices: PASSTHROUGH_DEVICES.iter().map(ToString::to_string).collect(),
        extra_hosts: vec![HOST_GATEWAY_ALIAS.to_string()],
        stop_timeout_secs: STOP_TIMEOUT_SECS,
    }
}

/// Container state as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContainerInspection {
    pub id: String,
    /// Runtime status string (`created`, `running`, `exited`, ...).
    pub status: String,
    pub running: bool,
    pub exit_code: i64,
    /// Runtime-reported error, empty when none.
    pub error: String,
    pub started_at: Option<String>,
    /// Guest port → published host port.
    pub host_ports: BTreeMap<u16, u16>,
}

/// Classification of an inspection for lifecycle decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerStatus {
    Running,
    /// Created or transitioning; not running yet.
    Pending,
    /// Stopped with exit code 0 and no runtime error.
    ExitedCleanly,
    /// Non-zero exit or runtime error. Terminal.
    Crashed { exit_code: i64, error: String },
}

impl ContainerInspection {
    #[must_use]
    pub fn classify(&self) -> ContainerStatus {
        if self.exit_code != 0 || !self.error.is_empty() {
            return ContainerStatus::Crashed {
                exit_code: self.exit_code,
                error: self.error.clone(),
            };
        }
        if self.running {
            return ContainerStatus::Running;
        }
        match self.status.as_str() {
            "exited" | "dead" => ContainerStatus::ExitedCleanly,
            _ => ContainerStatus::Pending,
        }
    }

    /// Exited from SIGTERM (143) or SIGKILL (137) with no runtime error,
    /// which is how a stop request ends the container.
    #[must_use]
    pub fn stopped_by_signal(&self) -> bool {
        !self.running
            && self.status == "exited"
            && self.error.is_empty()
            && STOP_SIGNAL_EXIT_CODES.contains(&self.exit_code)
    }

    #[must_use]
    pub fn host_port(&self, guest_port: u16) -> Option<u16> {
        self.host_ports.get(&guest_port).copied()
    }

    #[must_use]
    pub fn ssh_host_port(&self) -> Option<u16> {
        self.host_port(GUEST_SSH_PORT)
    }

    #[must_use]
    pub fn ui_host_port(&self) -> Option<u16> {
        self.host_port(GUEST_UI_PORT)
    }
}
