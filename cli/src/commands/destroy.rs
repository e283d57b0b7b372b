//! `guestbox destroy`: remove a workspace container and its volume.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::Removal;
use crate::commands::{Provider, WorkspaceArgs};
use crate::output::Renderer;

/// Arguments for the destroy command.
#[derive(Args)]
pub struct DestroyArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Skip confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

/// Run `guestbox destroy`.
///
/// # Errors
///
/// Returns an error if the container or volume cannot be removed.
pub async fn run(app: &AppContext, args: &DestroyArgs) -> Result<ExitCode> {
    let workspace = args.workspace.load()?;

    if !args.yes
        && !app.confirm(
            &format!("Remove workspace {} and its disk?", workspace.id),
            true,
        )?
    {
        app.output.notice("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }

    let provider = Provider::connect(app).await?;
    let reporter = app.reporter();
    let outcome = provider.lifecycle().destroy(&workspace, &reporter).await?;

    if let Renderer::Json(json) = app.renderer() {
        json.render(&serde_json::json!({
            "workspace_id": workspace.id,
            "container_removed": outcome.container == Removal::Removed,
            "volume_removed": outcome.volume == Removal::Removed,
        }))?;
    }
    Ok(ExitCode::SUCCESS)
}
