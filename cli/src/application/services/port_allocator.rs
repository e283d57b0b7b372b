//! Host port allocation for a new workspace container.
//!
//! Allocation is "free right now": nothing is held after the probe, so a
//! concurrent process may still take a port before the runtime binds it. The
//! runtime's bind failure surfaces as a create error the caller may retry.

use tracing::{debug, warn};

use crate::application::ports::{PortProbe, ProgressReporter};
use crate::domain::error::PortError;
use crate::domain::port_plan::{HOST_CONTROL_PORT, HOST_SSH_PORT, PortBindingSet, UI_PORT_BASE};
use crate::domain::target::ResolvedTarget;

/// First free port in `[start, start + limit)`.
///
/// # Errors
///
/// Returns `PortError::ScanExhausted` if every candidate is taken or the scan
/// would run past the end of the port range.
pub fn find_free_port(probe: &impl PortProbe, start: u16, limit: u16) -> Result<u16, PortError> {
    (0..limit)
        .map_while(|offset| start.checked_add(offset))
        .find(|port| probe.is_available(*port))
        .ok_or(PortError::ScanExhausted {
            start,
            attempts: limit,
        })
}

/// Plan the host side of every guest port binding.
///
/// SSH and the web desktop are required; the control port and the toolbox
/// channel are dropped with a warning when unavailable.
///
/// # Errors
///
/// Returns an error if a required port cannot be allocated.
pub fn allocate(
    probe: &impl PortProbe,
    target: &ResolvedTarget,
    ui_scan_limit: u16,
    reporter: &dyn ProgressReporter,
) -> Result<PortBindingSet, PortError> {
    if !probe.is_available(HOST_SSH_PORT) {
        return Err(PortError::RequiredPortInUse(HOST_SSH_PORT));
    }

    let control = if probe.is_available(HOST_CONTROL_PORT) {
        Some(HOST_CONTROL_PORT)
    } else {
        warn!(port = HOST_CONTROL_PORT, "control port in use, not publishing it");
        reporter.warn(&format!(
            "host port {HOST_CONTROL_PORT} is in use; the guest control port will not be published"
        ));
        None
    };

    let ui = find_free_port(probe, UI_PORT_BASE, ui_scan_limit)?;

    let toolbox = if target.wants_control_channel {
        match probe.ephemeral_port() {
            Ok(port) if probe.is_available(port) => Some(port),
            Ok(port) => {
                warn!(port, "ephemeral port taken before use");
                None
            }
            Err(e) => {
                warn!(error = %e, "no ephemeral port for the control channel");
                None
            }
        }
    } else {
        None
    };

    let plan = PortBindingSet {
        ssh: HOST_SSH_PORT,
        control,
        ui,
        toolbox,
    };
    debug!(?plan, "allocated host ports");
    Ok(plan)
}
