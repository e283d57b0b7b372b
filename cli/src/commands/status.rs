//! `guestbox status`: show the workspace container state.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::commands::{Provider, WorkspaceArgs};
use crate::output::Renderer;

/// Run `guestbox status`.
///
/// # Errors
///
/// Returns an error if the runtime cannot be queried.
pub async fn run(app: &AppContext, args: &WorkspaceArgs) -> Result<ExitCode> {
    let workspace = args.load()?;
    let provider = Provider::connect(app).await?;
    let status = provider.lifecycle().status(&workspace).await?;

    match app.renderer() {
        Renderer::Human(human) => human.render_status(&status),
        Renderer::Json(json) => json.render(&status)?,
    }
    Ok(ExitCode::SUCCESS)
}
