//! Common test utilities for bundlelock integration tests.
//!
//! This module provides:
//! - `TestEnv`: isolated repository and home directories plus CLI runner
//! - Fixtures: lockfile seeding helpers and a scripted installer

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
