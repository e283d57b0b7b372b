//! `guestbox config`: show the effective configuration.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::output::Renderer;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Print the configuration file path
    Path,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be located or parsed.
pub fn run(app: &AppContext, cmd: &ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => {
            let config = app.load_config()?;
            let path = app.config_store.path()?;
            match app.renderer() {
                Renderer::Human(human) => human.render_config(&config, &path),
                Renderer::Json(json) => json.render(&config)?,
            }
        }
        ConfigCommand::Path => {
            let path = app.config_store.path()?;
            match app.renderer() {
                Renderer::Human(_) => println!("{}", path.display()),
                Renderer::Json(json) => json.render(&serde_json::json!({ "path": path }))?,
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
