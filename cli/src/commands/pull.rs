//! `guestbox pull`: pull the guest image ahead of `create`.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::commands::Provider;

/// Arguments for the pull command.
#[derive(Args)]
pub struct PullArgs {
    /// Image to pull (defaults to the configured guest image)
    pub image: Option<String>,
}

/// Run `guestbox pull`.
///
/// # Errors
///
/// Returns an error if the pull fails.
pub async fn run(app: &AppContext, args: &PullArgs) -> Result<ExitCode> {
    let provider = Provider::connect(app).await?;
    let reporter = app.reporter();
    provider
        .lifecycle()
        .pull(args.image.as_deref(), &reporter)
        .await?;
    Ok(ExitCode::SUCCESS)
}
