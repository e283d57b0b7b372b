//! Application service: workspace lifecycle controller.
//!
//! States: absent → created → running → stopped → absent. Create and Start
//! only complete once the guest answers on SSH.
//!
//! Imports only from `crate::domain` and `crate::application`.

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Utc};
use guestbox_common::Workspace;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::application::ports::{
    ContainerRuntime, PortProbe, ProgressReporter, Removal, RemoteShell, UrlOpener,
};
use crate::application::services::boot::wait_for_boot;
use crate::application::services::poll::{Attempt, poll_until};
use crate::application::services::remote_exec::{execute_command, run_best_effort};
use crate::application::services::{port_allocator, web_ui};
use crate::domain::container::{
    ContainerInspection, ContainerStatus, STOP_TIMEOUT_SECS, build_container_spec,
};
use crate::domain::error::LifecycleError;
use crate::domain::guest::{env_commands, profile_commands};
use crate::domain::port_plan::{HOST_SSH_PORT, PortBindingSet};
use crate::domain::target::{ResolvedTarget, SshEndpoint};
use crate::domain::workspace::{
    container_name, label_filters, validate_container_name, volume_name,
};
use crate::domain::GuestboxConfig;

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// Outcome of [`WorkspaceLifecycle::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub container_id: String,
    pub ports: PortBindingSet,
    pub ui_url: Option<String>,
    /// Post-boot guest commands that failed and were skipped.
    pub failed_commands: usize,
}

/// Outcome of [`WorkspaceLifecycle::start`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    AlreadyRunning,
    Started { ui_url: Option<String> },
}

/// Outcome of [`WorkspaceLifecycle::stop`] and [`WorkspaceLifecycle::stop_via_runtime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    AlreadyStopped,
    /// The guest accepted the shutdown command. Power-off is not confirmed.
    GuestShutdown,
    /// Graceful shutdown failed; the container was killed.
    Killed,
    /// The runtime stopped the container.
    RuntimeStopped,
}

/// Outcome of [`WorkspaceLifecycle::destroy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestroyOutcome {
    pub container: Removal,
    pub volume: Removal,
}

/// Coarse workspace state for status queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceState {
    Absent,
    Running,
    Stopped,
    Crashed,
}

/// Snapshot of the workspace container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceStatus {
    pub workspace_id: String,
    pub container: String,
    pub state: WorkspaceState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ── Controller ────────────────────────────────────────────────────────────────

/// Lifecycle operations over injected ports and one immutable configuration.
pub struct WorkspaceLifecycle<'a, R, S, P, O> {
    runtime: &'a R,
    shell: &'a S,
    ports: &'a P,
    opener: &'a O,
    config: &'a GuestboxConfig,
}

impl<'a, R, S, P, O> WorkspaceLifecycle<'a, R, S, P, O>
where
    R: ContainerRuntime,
    S: RemoteShell,
    P: PortProbe,
    O: UrlOpener,
{
    pub fn new(
        runtime: &'a R,
        shell: &'a S,
        ports: &'a P,
        opener: &'a O,
        config: &'a GuestboxConfig,
    ) -> Self {
        Self {
            runtime,
            shell,
            ports,
            opener,
            config,
        }
    }

    fn target(&self, workspace: &Workspace) -> ResolvedTarget {
        ResolvedTarget::resolve(&self.config.target, workspace)
    }

    fn endpoint(&self, target: &ResolvedTarget, ssh_port: Option<u16>) -> SshEndpoint {
        target.ssh_endpoint(
            ssh_port.unwrap_or(HOST_SSH_PORT),
            &self.config.credentials(),
        )
    }

    /// Provision a new workspace and wait until its guest is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if port allocation or any runtime call fails, the
    /// container exits before running, or the guest crashes while booting.
    /// Individual post-boot guest commands never fail the call.
    pub async fn create(
        &self,
        workspace: &Workspace,
        reporter: &dyn ProgressReporter,
    ) -> Result<CreateOutcome> {
        let target = self.target(workspace);
        let name = container_name(workspace);
        validate_container_name(&name)?;

        reporter.step("Allocating host ports...");
        let ports = port_allocator::allocate(
            self.ports,
            &target,
            self.config.timing.ui_port_scan_limit,
            reporter,
        )?;

        reporter.step(&format!("Creating container {name}..."));
        let spec = build_container_spec(workspace, &self.config.guest.image, ports);
        let container_id = self
            .runtime
            .create(&spec)
            .await
            .context("failed to create container")?;
        info!(container = name.as_str(), id = container_id.as_str(), "container created");

        self.runtime
            .start(&name)
            .await
            .context("failed to start container")?;
        self.wait_running(&name).await?;
        info!(container = name.as_str(), "container running");

        reporter.log("Installing guest operating system...");
        let ui_url = web_ui::announce(self.opener, &target, Some(ports.ui), reporter);

        reporter.step("Waiting for guest to boot...");
        let endpoint = self.endpoint(&target, Some(ports.ssh));
        wait_for_boot(
            self.runtime,
            self.shell,
            &name,
            &endpoint,
            &self.config.boot_policy(),
        )
        .await?;

        reporter.step("Configuring guest...");
        let failed_commands = self.configure_guest(workspace, &endpoint, reporter).await?;
        if failed_commands > 0 {
            reporter.warn(&format!(
                "{failed_commands} guest configuration command(s) failed"
            ));
        }

        reporter.success(&format!("Workspace {} created", workspace.id));
        Ok(CreateOutcome {
            container_id,
            ports,
            ui_url,
            failed_commands,
        })
    }

    /// Apply workspace environment and profile commands over one session.
    async fn configure_guest(
        &self,
        workspace: &Workspace,
        endpoint: &SshEndpoint,
        reporter: &dyn ProgressReporter,
    ) -> Result<usize> {
        let session = self
            .shell
            .connect(endpoint)
            .await
            .context("failed to open guest session")?;
        let mut commands = env_commands(&workspace.env_vars);
        commands.extend(profile_commands(&self.config.guest));
        Ok(run_best_effort(&session, &commands, reporter).await)
    }

    /// Start a stopped workspace and wait until its guest answers.
    ///
    /// # Errors
    ///
    /// Returns an error if the container does not exist, any runtime call
    /// fails, or the guest crashes while booting.
    pub async fn start(
        &self,
        workspace: &Workspace,
        reporter: &dyn ProgressReporter,
    ) -> Result<StartOutcome> {
        let target = self.target(workspace);
        let container = self.resolve_container(workspace).await?;
        let inspection = self.inspect_existing(&container).await?;
        if inspection.classify() == ContainerStatus::Running {
            info!(container = container.as_str(), "already running");
            return Ok(StartOutcome::AlreadyRunning);
        }

        reporter.step(&format!("Starting container {container}..."));
        self.runtime
            .start(&container)
            .await
            .context("failed to start container")?;
        let running = self.wait_running(&container).await?;

        let ui_url = web_ui::announce(self.opener, &target, running.ui_host_port(), reporter);

        reporter.step("Waiting for guest to boot...");
        let endpoint = self.endpoint(&target, running.ssh_host_port());
        wait_for_boot(
            self.runtime,
            self.shell,
            &container,
            &endpoint,
            &self.config.boot_policy(),
        )
        .await?;

        reporter.success(&format!("Workspace {} started", workspace.id));
        Ok(StartOutcome::Started { ui_url })
    }

    /// Shut the guest down, killing the container if the guest will not.
    ///
    /// # Errors
    ///
    /// Returns an error if the container does not exist or the kill fails.
    pub async fn stop(
        &self,
        workspace: &Workspace,
        reporter: &dyn ProgressReporter,
    ) -> Result<StopOutcome> {
        let target = self.target(workspace);
        let container = self.resolve_container(workspace).await?;
        let inspection = self.inspect_existing(&container).await?;
        if !inspection.running {
            return Ok(StopOutcome::AlreadyStopped);
        }

        reporter.step("Shutting down guest...");
        let endpoint = self.endpoint(&target, inspection.ssh_host_port());
        match self.request_guest_shutdown(&endpoint).await {
            Ok(()) => {
                debug!(
                    container = container.as_str(),
                    "shutdown accepted; container state not verified"
                );
                reporter.success(&format!("Workspace {} is shutting down", workspace.id));
                return Ok(StopOutcome::GuestShutdown);
            }
            Err(e) => {
                warn!(container = container.as_str(), error = %format!("{e:#}"), "graceful shutdown failed");
                reporter.warn("Graceful shutdown failed, stopping container");
            }
        }

        self.drain_sessions(&endpoint).await;
        self.runtime
            .kill(&container)
            .await
            .context("failed to kill container")?;
        info!(container = container.as_str(), "container killed");
        reporter.success(&format!("Workspace {} stopped", workspace.id));
        Ok(StopOutcome::Killed)
    }

    async fn request_guest_shutdown(&self, endpoint: &SshEndpoint) -> Result<()> {
        let session = self
            .shell
            .connect(endpoint)
            .await
            .context("failed to open guest session")?;
        execute_command(&session, &self.config.guest.shutdown_command, None).await?;
        Ok(())
    }

    /// Reconnect until the guest stops accepting sessions or the policy runs out.
    async fn drain_sessions(&self, endpoint: &SshEndpoint) {
        let policy = self.config.stop_drain_policy();
        let drained = poll_until(&policy, "guest to stop accepting sessions", move |attempt| {
            async move {
                match self.shell.connect(endpoint).await {
                    Ok(session) => {
                        drop(session);
                        debug!(attempt, "guest still accepting sessions");
                        Attempt::Pending
                    }
                    Err(_) => Attempt::Ready(()),
                }
            }
        })
        .await;
        if let Err(e) = drained {
            debug!(error = %e, "guest still reachable, killing anyway");
        }
    }

    /// Ask the runtime for a graceful stop with its own kill fallback.
    ///
    /// # Errors
    ///
    /// Returns an error if the container does not exist or the runtime call fails.
    pub async fn stop_via_runtime(
        &self,
        workspace: &Workspace,
        reporter: &dyn ProgressReporter,
    ) -> Result<StopOutcome> {
        let container = self.resolve_container(workspace).await?;
        let inspection = self.inspect_existing(&container).await?;
        if !inspection.running {
            return Ok(StopOutcome::AlreadyStopped);
        }
        reporter.step(&format!("Stopping container {container}..."));
        self.runtime
            .stop(&container, STOP_TIMEOUT_SECS)
            .await
            .context("failed to stop container")?;
        reporter.success(&format!("Workspace {} stopped", workspace.id));
        Ok(StopOutcome::RuntimeStopped)
    }

    /// Remove the container and its volume. Missing resources are not errors.
    ///
    /// # Errors
    ///
    /// Returns an error if either removal fails; both failures are reported
    /// together.
    pub async fn destroy(
        &self,
        workspace: &Workspace,
        reporter: &dyn ProgressReporter,
    ) -> Result<DestroyOutcome> {
        let container = self.resolve_container(workspace).await?;
        let volume = volume_name(workspace);
        reporter.step(&format!("Removing container {container}..."));

        let container_removal = self.runtime.remove_container(&container).await;
        let volume_removal = self.runtime.remove_volume(&volume).await;

        let outcome = match (container_removal, volume_removal) {
            (Ok(container), Ok(volume)) => DestroyOutcome { container, volume },
            (Err(e), Ok(_)) => return Err(e.context("failed to remove container")),
            (Ok(_), Err(e)) => return Err(e.context("failed to remove volume")),
            (Err(c), Err(v)) => {
                return Err(LifecycleError::TeardownFailed {
                    container: format!("{c:#}"),
                    volume: format!("{v:#}"),
                }
                .into());
            }
        };
        info!(container = container.as_str(), ?outcome, "workspace removed");
        reporter.success(&format!("Workspace {} removed", workspace.id));
        Ok(outcome)
    }

    /// Report the container state without changing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be queried.
    pub async fn status(&self, workspace: &Workspace) -> Result<WorkspaceStatus> {
        let target = self.target(workspace);
        let container = self.resolve_container(workspace).await?;
        let inspection = self
            .runtime
            .inspect(&container)
            .await
            .context("failed to inspect container")?;

        let Some(inspection) = inspection else {
            return Ok(WorkspaceStatus {
                workspace_id: workspace.id.clone(),
                container,
                state: WorkspaceState::Absent,
                container_id: None,
                ssh_port: None,
                ui_port: None,
                ui_url: None,
                started_at: None,
                error: None,
            });
        };

        let (state, error) = match inspection.classify() {
            ContainerStatus::Crashed { .. } if inspection.stopped_by_signal() => {
                (WorkspaceState::Stopped, None)
            }
            ContainerStatus::Running => (WorkspaceState::Running, None),
            ContainerStatus::Pending | ContainerStatus::ExitedCleanly => {
                (WorkspaceState::Stopped, None)
            }
            ContainerStatus::Crashed { exit_code, error } => (
                WorkspaceState::Crashed,
                Some(LifecycleError::ContainerCrashed { exit_code, error }.to_string()),
            ),
        };
        let running = state == WorkspaceState::Running;
        let ui_port = inspection.ui_host_port().filter(|_| running);

        Ok(WorkspaceStatus {
            workspace_id: workspace.id.clone(),
            container,
            state,
            container_id: Some(inspection.id.clone()),
            ssh_port: inspection.ssh_host_port().filter(|_| running),
            ui_port,
            ui_url: ui_port.map(|port| target.ui_url(port)),
            started_at: parse_started_at(inspection.started_at.as_deref()).filter(|_| running),
            error,
        })
    }

    /// Open the guest desktop of a running workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the container does not exist or is not running.
    pub async fn open_ui(
        &self,
        workspace: &Workspace,
        reporter: &dyn ProgressReporter,
    ) -> Result<Option<String>> {
        let target = self.target(workspace);
        let container = self.resolve_container(workspace).await?;
        let inspection = self.inspect_existing(&container).await?;
        anyhow::ensure!(
            inspection.running,
            "workspace {} is not running. Run 'guestbox start' first.",
            workspace.id
        );
        Ok(web_ui::announce(
            self.opener,
            &target,
            inspection.ui_host_port(),
            reporter,
        ))
    }

    /// Copy container logs to the reporter.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot stream the logs.
    pub async fn logs(
        &self,
        workspace: &Workspace,
        follow: bool,
        reporter: &dyn ProgressReporter,
    ) -> Result<()> {
        let container = self.resolve_container(workspace).await?;
        self.runtime
            .logs(&container, follow, reporter)
            .await
            .with_context(|| format!("failed to read logs of {container}"))
    }

    /// Pull `image`, or the configured guest image.
    ///
    /// # Errors
    ///
    /// Returns an error if the pull fails.
    pub async fn pull(&self, image: Option<&str>, reporter: &dyn ProgressReporter) -> Result<()> {
        let image = image.unwrap_or(&self.config.guest.image);
        reporter.step(&format!("Pulling {image}..."));
        self.runtime
            .pull_image(image, reporter)
            .await
            .with_context(|| format!("failed to pull image {image}"))?;
        reporter.success(&format!("Pulled {image}"));
        Ok(())
    }

    /// Container for a workspace: label lookup first, then the derived name.
    async fn resolve_container(&self, workspace: &Workspace) -> Result<String> {
        let found = self
            .runtime
            .find_by_labels(&label_filters(workspace))
            .await
            .context("failed to list containers")?;
        if let Some(id) = found.into_iter().next() {
            debug!(workspace = workspace.id.as_str(), id = id.as_str(), "container found by labels");
            return Ok(id);
        }
        Ok(container_name(workspace))
    }

    async fn inspect_existing(&self, container: &str) -> Result<ContainerInspection> {
        self.runtime
            .inspect(container)
            .await
            .context("failed to inspect container")?
            .ok_or_else(|| LifecycleError::ContainerNotFound(container.to_string()).into())
    }

    /// Poll until a freshly started container reports running.
    async fn wait_running(&self, container: &str) -> Result<ContainerInspection> {
        let policy = self.config.running_policy();
        poll_until(&policy, "container to run", move |_| async move {
            let inspection = match self.runtime.inspect(container).await {
                Ok(Some(inspection)) => inspection,
                Ok(None) => {
                    return Attempt::Fatal(
                        LifecycleError::ContainerNotFound(container.to_string()).into(),
                    );
                }
                Err(e) => return Attempt::Fatal(e.context("failed to inspect container")),
            };
            match inspection.classify() {
                ContainerStatus::Running => Attempt::Ready(inspection),
                ContainerStatus::Pending => Attempt::Pending,
                ContainerStatus::ExitedCleanly => Attempt::Fatal(
                    LifecycleError::ContainerExited(container.to_string()).into(),
                ),
                ContainerStatus::Crashed { exit_code, error } => {
                    Attempt::Fatal(LifecycleError::ContainerCrashed { exit_code, error }.into())
                }
            }
        })
        .await
    }
}

/// Parse the runtime's start timestamp; the zero time means never started.
fn parse_started_at(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(raw?).ok()?.with_timezone(&Utc);
    (parsed.year() > 1).then_some(parsed)
}
