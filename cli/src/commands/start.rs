//! `guestbox start`: start a stopped workspace.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::StartOutcome;
use crate::commands::{Provider, WorkspaceArgs};
use crate::output::Renderer;

/// Run `guestbox start`.
///
/// # Errors
///
/// Returns an error if the workspace does not exist or its guest never boots.
pub async fn run(app: &AppContext, args: &WorkspaceArgs) -> Result<ExitCode> {
    let workspace = args.load()?;
    let provider = Provider::connect(app).await?;
    let reporter = app.reporter();

    let outcome = provider.lifecycle().start(&workspace, &reporter).await?;

    match app.renderer() {
        Renderer::Human(_) => match &outcome {
            StartOutcome::AlreadyRunning => {
                app.output
                    .notice(&format!("Workspace {} is already running", workspace.id));
            }
            StartOutcome::Started { ui_url: Some(url) } => app.output.field("Desktop:", url),
            StartOutcome::Started { ui_url: None } => {}
        },
        Renderer::Json(json) => {
            let (already_running, ui_url) = match outcome {
                StartOutcome::AlreadyRunning => (true, None),
                StartOutcome::Started { ui_url } => (false, ui_url),
            };
            json.render(&serde_json::json!({
                "workspace_id": workspace.id,
                "already_running": already_running,
                "ui_url": ui_url,
            }))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
