//! `guestbox open`: open the guest desktop in a local viewer.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::commands::{Provider, WorkspaceArgs};
use crate::output::Renderer;

/// Run `guestbox open`.
///
/// # Errors
///
/// Returns an error if the workspace is not running.
pub async fn run(app: &AppContext, args: &WorkspaceArgs) -> Result<ExitCode> {
    let workspace = args.load()?;
    let provider = Provider::connect(app).await?;
    let reporter = app.reporter();
    let url = provider.lifecycle().open_ui(&workspace, &reporter).await?;

    match app.renderer() {
        Renderer::Human(_) => {
            if url.is_none() {
                app.output.caution("The guest desktop port is not published");
            }
        }
        Renderer::Json(json) => json.render(&serde_json::json!({ "ui_url": url }))?,
    }
    Ok(ExitCode::SUCCESS)
}
