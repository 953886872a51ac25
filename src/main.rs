//! Bundlelock CLI - inspect and maintain a repository's bundle lockfile
//!
//! Usage: bundlelock [--root DIR] [--json] [-v] <COMMAND>
//!
//! Commands:
//!   show      Print the lockfile
//!   validate  Validate the lockfile against its schema
//!   drift     List edited or deleted files of a bundle
//!   remove    Remove a bundle from the lockfile
//!   watch     Print lockfile changes until Ctrl+C

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bundlelock::presentation::{Cli, Commands};
use bundlelock::Config;

mod commands;
mod ui;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let config = Config::load_or_default(Some(&root));

    match cli.command {
        Commands::Show => commands::show::cmd_show(&root, &config, cli.json),
        Commands::Validate => commands::validate::cmd_validate(&root, &config, cli.json),
        Commands::Drift { bundle_id } => {
            commands::drift::cmd_drift(&root, &config, &bundle_id, cli.json)
        }
        Commands::Remove { bundle_id } => {
            commands::remove::cmd_remove(&root, &config, &bundle_id, cli.json)
        }
        Commands::Watch => commands::watch::cmd_watch(&root, &config, cli.json),
    }
}

/// Logs go to stderr; `-v` wins over `RUST_LOG`, which wins over `warn`
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
