//! Web UI launcher.
//!
//! Opening a viewer is a detached side effect: the result is only logged and
//! never fails the enclosing operation.

use tracing::{info, warn};

use crate::application::ports::{ProgressReporter, UrlOpener};
use crate::domain::target::ResolvedTarget;

/// Announce the guest desktop and try to open it locally.
///
/// Returns the desktop URL, or `None` when no UI port is published.
pub fn announce(
    opener: &impl UrlOpener,
    target: &ResolvedTarget,
    ui_port: Option<u16>,
    reporter: &dyn ProgressReporter,
) -> Option<String> {
    let Some(port) = ui_port else {
        warn!("no host port published for the guest desktop");
        return None;
    };
    let url = target.ui_url(port);
    match opener.open(&url) {
        Ok(()) => info!(url = url.as_str(), "opened guest desktop viewer"),
        Err(e) => {
            warn!(url = url.as_str(), error = %e, "could not open a viewer");
            reporter.log(&format!("Guest desktop available at {url}"));
        }
    }
    Some(url)
}
