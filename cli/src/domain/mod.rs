//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod container;
pub mod error;
pub mod guest;
pub mod port_plan;
pub mod retry;
pub mod target;
pub mod workspace;

pub use config::{GuestSettings, GuestboxConfig, TimingSettings};
pub use container::{ContainerInspection, ContainerSpec, ContainerStatus, build_container_spec};
pub use error::{ConfigError, GuestError, LifecycleError, PortError};
pub use port_plan::PortBindingSet;
pub use retry::RetryPolicy;
pub use target::{GuestCredentials, ResolvedTarget, SshEndpoint};
pub use workspace::{container_name, label_filters, volume_name};
