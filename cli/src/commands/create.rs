//! `guestbox create`: provision a workspace and wait for its guest.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::commands::{Provider, WorkspaceArgs};
use crate::output::Renderer;

/// Run `guestbox create`.
///
/// # Errors
///
/// Returns an error if the workspace cannot be created or never boots.
pub async fn run(app: &AppContext, args: &WorkspaceArgs) -> Result<ExitCode> {
    let workspace = args.load()?;
    let provider = Provider::connect(app).await?;
    let reporter = app.reporter();

    let outcome = provider.lifecycle().create(&workspace, &reporter).await?;

    match app.renderer() {
        Renderer::Human(_) => {
            if let Some(url) = &outcome.ui_url {
                app.output.field("Desktop:", url);
            }
            app.output.field("SSH port:", outcome.ports.ssh);
        }
        Renderer::Json(json) => json.render(&serde_json::json!({
            "workspace_id": workspace.id,
            "container_id": outcome.container_id,
            "ssh_port": outcome.ports.ssh,
            "control_port": outcome.ports.control,
            "ui_port": outcome.ports.ui,
            "toolbox_port": outcome.ports.toolbox,
            "ui_url": outcome.ui_url,
            "failed_commands": outcome.failed_commands,
        }))?,
    }
    Ok(ExitCode::SUCCESS)
}
