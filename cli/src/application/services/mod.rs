//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`; never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod boot;
pub mod lifecycle;
pub mod poll;
pub mod port_allocator;
pub mod remote_exec;
pub mod requirements;
pub mod web_ui;

#[cfg(test)]
pub(crate) mod test_support;

pub use lifecycle::{
    CreateOutcome, DestroyOutcome, StartOutcome, StopOutcome, WorkspaceLifecycle, WorkspaceState,
    WorkspaceStatus,
};
pub use requirements::{RequirementStatus, check_requirements};
