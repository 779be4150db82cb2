//! Binary crate for the `weather-icon` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Reading weather and astronomy records from disk
//! - Interactive configuration
//! - Human-friendly output formatting

use clap::Parser;
use env_logger::Env;

mod cli;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cmd = cli::Cli::parse();
    cmd.run()
}
