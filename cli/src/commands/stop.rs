//! `guestbox stop`: shut a workspace down.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::StopOutcome;
use crate::commands::{Provider, WorkspaceArgs};
use crate::output::Renderer;

/// Arguments for the stop command.
#[derive(Args)]
pub struct StopArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Skip the in-guest shutdown and let the runtime stop the container
    #[arg(long)]
    pub runtime_only: bool,
}

/// Run `guestbox stop`.
///
/// # Errors
///
/// Returns an error if the workspace does not exist or cannot be stopped.
pub async fn run(app: &AppContext, args: &StopArgs) -> Result<ExitCode> {
    let workspace = args.workspace.load()?;
    let provider = Provider::connect(app).await?;
    let reporter = app.reporter();
    let lifecycle = provider.lifecycle();

    let outcome = if args.runtime_only {
        lifecycle.stop_via_runtime(&workspace, &reporter).await?
    } else {
        lifecycle.stop(&workspace, &reporter).await?
    };

    match app.renderer() {
        Renderer::Human(_) => {
            if outcome == StopOutcome::AlreadyStopped {
                app.output
                    .notice(&format!("Workspace {} is not running", workspace.id));
            }
        }
        Renderer::Json(json) => json.render(&serde_json::json!({
            "workspace_id": workspace.id,
            "outcome": outcome_name(outcome),
        }))?,
    }
    Ok(ExitCode::SUCCESS)
}

fn outcome_name(outcome: StopOutcome) -> &'static str {
    match outcome {
        StopOutcome::AlreadyStopped => "already_stopped",
        StopOutcome::GuestShutdown => "guest_shutdown",
        StopOutcome::Killed => "killed",
        StopOutcome::RuntimeStopped => "runtime_stopped",
    }
}
