//! guestbox - run a virtualized guest OS inside a container

use std::process::ExitCode;

use clap::Parser;
use guestbox_cli::cli::Cli;
use guestbox_cli::infra::tunnel::askpass_reply;
use guestbox_cli::output::json::{error_code, format_error};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "GUESTBOX_LOG";

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Started by `ssh` as the askpass helper of a remote tunnel.
    if let Some(secret) = askpass_reply() {
        println!("{secret}");
        return ExitCode::SUCCESS;
    }
    init_tracing();
    let cli = Cli::parse();
    let json = cli.global.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            match format_error(&format!("{e:#}"), error_code(&e)) {
                Ok(body) if json => println!("{body}"),
                _ => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
