//! Host port probe: a port is free if it can be bound right now.

use std::net::{Ipv4Addr, TcpListener};

use anyhow::Result;

use crate::application::ports::PortProbe;
use crate::domain::error::PortError;

/// Production `PortProbe`. Listeners are dropped before returning.
pub struct HostPortProbe;

impl PortProbe for HostPortProbe {
    fn is_available(&self, port: u16) -> bool {
        TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).is_ok()
    }

    fn ephemeral_port(&self) -> Result<u16> {
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, 0))
            .map_err(|e| PortError::NoEphemeralPort(e.to_string()))?;
        let addr = listener
            .local_addr()
            .map_err(|e| PortError::NoEphemeralPort(e.to_string()))?;
        Ok(addr.port())
    }
}
