//! Guest-to-host port bindings for a workspace container.

/// SSH inside the guest.
pub const GUEST_SSH_PORT: u16 = 22;
/// Host port SSH is published on.
pub const HOST_SSH_PORT: u16 = 10022;
/// Auxiliary control port inside the guest.
pub const GUEST_CONTROL_PORT: u16 = 2222;
/// Host port the auxiliary control port is published on.
pub const HOST_CONTROL_PORT: u16 = 2222;
/// Web desktop inside the container.
pub const GUEST_UI_PORT: u16 = 8006;
/// First host port tried for the web desktop.
pub const UI_PORT_BASE: u16 = 8006;
/// Out-of-band control channel, published only for local targets.
pub const GUEST_TOOLBOX_PORT: u16 = 2280;

/// Runtime key for a TCP port, e.g. `"22/tcp"`.
#[must_use]
pub fn tcp_key(port: u16) -> String {
    format!("{port}/tcp")
}

/// Host ports allocated for one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortBindingSet {
    pub ssh: u16,
    /// `None` when the host control port was unavailable.
    pub control: Option<u16>,
    pub ui: u16,
    /// Ephemeral host port for the control channel, when allocated.
    pub toolbox: Option<u16>,
}

impl PortBindingSet {
    /// `(guest, host)` pairs, in guest port order.
    #[must_use]
    pub fn bindings(&self) -> Vec<(u16, u16)> {
        let mut pairs = vec![(GUEST_SSH_PORT, self.ssh), (GUEST_UI_PORT, self.ui)];
        if let Some(host) = self.control {
            pairs.push((GUEST_CONTROL_PORT, host));
        }
        if let Some(host) = self.toolbox {
            pairs.push((GUEST_TOOLBOX_PORT, host));
        }
        pairs.sort_unstable();
        pairs
    }

    /// Guest ports the container must expose.
    #[must_use]
    pub fn exposed_ports(&self) -> Vec<u16> {
        self.bindings().into_iter().map(|(guest, _)| guest).collect()
    }
}
