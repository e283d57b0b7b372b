//! Unit tests for the guestbox CLI
//!
//! These tests use fake ports and run fast without a container runtime.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod architecture;
mod lifecycle;
mod mocks;
mod property_tests;
