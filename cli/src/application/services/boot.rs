//! Boot synchronizer: wait until the guest OS answers on SSH.
//!
//! Each tick re-inspects the container first. A crashed container ends the
//! wait at once since the guest will never come up; a refused or timed-out
//! SSH dial is the normal state while the guest is still booting.

use anyhow::Result;
use tracing::{debug, info};

use crate::application::ports::{ContainerRuntime, RemoteShell};
use crate::application::services::poll::{Attempt, poll_until};
use crate::domain::container::ContainerStatus;
use crate::domain::error::LifecycleError;
use crate::domain::retry::RetryPolicy;
use crate::domain::target::SshEndpoint;

/// Block until the container runs and the guest accepts an SSH login.
///
/// # Errors
///
/// Returns an error if the container crashes or disappears, inspection
/// fails, or a bounded policy runs out.
pub async fn wait_for_boot(
    runtime: &impl ContainerRuntime,
    shell: &impl RemoteShell,
    container: &str,
    endpoint: &SshEndpoint,
    policy: &RetryPolicy,
) -> Result<()> {
    info!(container, host = %endpoint.host, port = endpoint.port, "waiting for guest to boot");
    poll_until(policy, "guest to boot", move |attempt| async move {
        boot_tick(runtime, shell, container, endpoint, attempt).await
    })
    .await?;
    info!(container, "guest is reachable");
    Ok(())
}

async fn boot_tick(
    runtime: &impl ContainerRuntime,
    shell: &impl RemoteShell,
    container: &str,
    endpoint: &SshEndpoint,
    attempt: u32,
) -> Attempt<()> {
    let inspection = match runtime.inspect(container).await {
        Ok(Some(inspection)) => inspection,
        Ok(None) => {
            return Attempt::Fatal(LifecycleError::ContainerNotFound(container.to_string()).into());
        }
        Err(e) => return Attempt::Fatal(e.context("inspecting container during boot-wait")),
    };

    match inspection.classify() {
        ContainerStatus::Crashed { exit_code, error } => {
            return Attempt::Fatal(LifecycleError::ContainerCrashed { exit_code, error }.into());
        }
        ContainerStatus::Running => {}
        status @ (ContainerStatus::Pending | ContainerStatus::ExitedCleanly) => {
            debug!(container, attempt, ?status, "container not running yet");
            return Attempt::Pending;
        }
    }

    match shell.connect(endpoint).await {
        Ok(probe) => {
            drop(probe);
            Attempt::Ready(())
        }
        Err(e) => {
            debug!(container, attempt, error = %e, "guest not reachable yet");
            Attempt::Pending
        }
    }
}
