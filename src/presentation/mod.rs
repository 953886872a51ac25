//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating repositories and use cases with infrastructure dependencies
//!
//! ## Structure
//!
//! - `cli` - Command line definition
//! - `factory` - Creates repositories and use cases (dependency injection)

pub mod cli;
pub mod factory;

pub use cli::{Cli, Commands};
pub use factory::{
    create_lifecycle_coordinator, create_lockfile_repository, create_repository_registry,
};
