//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! Global flags (--root, --json, --verbose) are inherited by all subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Bundlelock - inspect and maintain a repository's bundle lockfile
#[derive(Parser, Debug)]
#[command(name = "bundlelock")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Repository root holding the lockfile (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Output JSON (one event per line)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Print the lockfile
    Show,

    /// Validate the lockfile against its schema (exits non-zero when invalid)
    Validate,

    /// List tracked files of a bundle that were edited or deleted
    Drift {
        /// Bundle id as recorded in the lockfile
        bundle_id: String,
    },

    /// Remove a bundle from the lockfile
    Remove {
        /// Bundle id as recorded in the lockfile
        bundle_id: String,
    },

    /// Print lockfile changes until Ctrl+C
    Watch,
}
