//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::app::AppContext;
use crate::commands;

/// Run a virtualized guest OS in a container, reachable over SSH and a web desktop
#[derive(Parser)]
#[command(
    name = "guestbox",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags accepted before or after any subcommand.
#[derive(Args, Debug, Default)]
pub struct GlobalFlags {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file (default: ~/.guestbox/config.yaml)
    #[arg(long, global = true, env = crate::infra::config::CONFIG_ENV)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a workspace and wait for its guest to boot
    Create(commands::WorkspaceArgs),

    /// Start a stopped workspace
    Start(commands::WorkspaceArgs),

    /// Shut a workspace down
    Stop(commands::stop::StopArgs),

    /// Remove a workspace container and its volume
    Destroy(commands::destroy::DestroyArgs),

    /// Show workspace state and ports
    Status(commands::WorkspaceArgs),

    /// Print container logs
    Logs(commands::logs::LogsArgs),

    /// Pull the guest image
    Pull(commands::pull::PullArgs),

    /// Open the guest desktop
    Open(commands::WorkspaceArgs),

    /// Check host requirements
    Doctor,

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let app = AppContext::new(&self.global);

        match &self.command {
            Command::Create(args) => commands::create::run(&app, args).await,
            Command::Start(args) => commands::start::run(&app, args).await,
            Command::Stop(args) => commands::stop::run(&app, args).await,
            Command::Destroy(args) => commands::destroy::run(&app, args).await,
            Command::Status(args) => commands::status::run(&app, args).await,
            Command::Logs(args) => commands::logs::run(&app, args).await,
            Command::Pull(args) => commands::pull::run(&app, args).await,
            Command::Open(args) => commands::open::run(&app, args).await,
            Command::Doctor => commands::doctor::run(&app).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Version => commands::version::run(&app),
        }
    }
}
