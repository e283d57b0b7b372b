//! Integration tests for the guestbox CLI
//!
//! These tests spawn the actual binary. None of them needs a container
//! runtime; commands that would reach one fail before connecting.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod cli_tests;
mod config_command;
