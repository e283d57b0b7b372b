//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: the container runtime
//! client and its SSH forward, SSH sessions, host port probing, URL launching, and file access.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod browser;
pub mod config;
pub mod docker;
pub mod network;
pub mod ssh;
pub mod tunnel;
pub mod workspace_file;
