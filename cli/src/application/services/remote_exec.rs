//! Remote command executor.

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::application::ports::{CommandOutput, ProgressReporter, RemoteSession};
use crate::domain::error::GuestError;

/// Run `command` in the guest, mirroring its output to `sink` when given.
///
/// # Errors
///
/// Returns an error carrying the command text if the session fails or the
/// command exits non-zero.
pub async fn execute_command(
    session: &impl RemoteSession,
    command: &str,
    sink: Option<&dyn ProgressReporter>,
) -> Result<CommandOutput> {
    debug!(command, "running guest command");
    let output = session
        .exec(command)
        .await
        .with_context(|| format!("running `{command}` in guest"))?;

    if let Some(sink) = sink {
        output
            .stdout
            .lines()
            .chain(output.stderr.lines())
            .filter(|line| !line.trim().is_empty())
            .for_each(|line| sink.log(line));
    }

    if output.status != 0 {
        // Sessions that merge both streams leave stderr empty.
        let detail = match output.stderr.trim() {
            "" => output.stdout.trim(),
            stderr => stderr,
        };
        return Err(GuestError::CommandFailed {
            command: command.to_string(),
            status: output.status,
            output: detail.to_string(),
        }
        .into());
    }
    Ok(output)
}

/// Run every command in order, tolerating individual failures.
///
/// Each failure is reported as a warning. Returns the number of failures.
pub async fn run_best_effort(
    session: &impl RemoteSession,
    commands: &[String],
    reporter: &dyn ProgressReporter,
) -> usize {
    let mut failures = 0;
    for command in commands {
        if let Err(e) = execute_command(session, command, Some(reporter)).await {
            warn!(command = command.as_str(), error = %e, "guest command failed");
            reporter.warn(&format!("{e:#}"));
            failures += 1;
        }
    }
    failures
}
