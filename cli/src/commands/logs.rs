//! `guestbox logs`: print the container log.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::commands::{Provider, WorkspaceArgs};
use crate::output::{OutputContext, TerminalReporter};

/// Arguments for the logs command.
#[derive(Args)]
pub struct LogsArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Follow log output
    #[arg(long, short)]
    pub follow: bool,
}

/// Run `guestbox logs`.
///
/// # Errors
///
/// Returns an error if the runtime cannot stream the logs.
pub async fn run(app: &AppContext, args: &LogsArgs) -> Result<ExitCode> {
    let workspace = args.workspace.load()?;
    let provider = Provider::connect(app).await?;
    // Logs are the command's output; `--quiet` must not swallow them.
    let ctx = OutputContext::new(true, false);
    let reporter = TerminalReporter::new(&ctx);

    let lifecycle = provider.lifecycle();
    tokio::select! {
        result = lifecycle.logs(&workspace, args.follow, &reporter) => result?,
        _ = tokio::signal::ctrl_c() => {}
    }
    Ok(ExitCode::SUCCESS)
}
