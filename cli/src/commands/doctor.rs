//! `guestbox doctor`: check host requirements.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::requirements::{RUNTIME_CONFIGURED, check_requirements};
use crate::application::services::RequirementStatus;
use crate::infra::docker::BollardRuntime;
use crate::infra::network::HostPortProbe;
use crate::output::Renderer;
use crate::output::progress::Spinner;

/// Run `guestbox doctor`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let config = app.load_config()?;

    let spinner = if app.is_json() {
        None
    } else {
        Some(Spinner::start(&app.output, "Checking requirements..."))
    };

    let results = match BollardRuntime::connect(&config.target).await {
        Ok(runtime) => check_requirements(&runtime, &HostPortProbe).await,
        Err(e) => vec![RequirementStatus::unmet(
            RUNTIME_CONFIGURED,
            format!("Cannot create a container runtime client: {e:#}"),
        )],
    };

    if let Some(spinner) = spinner {
        spinner.clear();
    }

    let all_met = match app.renderer() {
        Renderer::Human(human) => human.render_requirements(&results),
        Renderer::Json(json) => {
            json.render(&results)?;
            results.iter().all(|r| r.met)
        }
    };

    Ok(if all_met {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
