// [apps/agent/src/cli.rs]
//! Command-line surface: a config-path override, a debug flag, and the
//! `init` subcommand for first-run credential setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "cipherswarm-agent",
    version,
    about = "CipherSwarm fleet worker agent: polls for cracking tasks and supervises a local cracker process."
)]
pub struct Cli {
    /// Path to `cipherswarmagent.yaml`. Overrides the usual search order.
    #[arg(long, env = "CIPHERSWARM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose logging (overrides `RUST_LOG`).
    #[arg(long, env = "CIPHERSWARM_DEBUG")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactively prompt for the API URL and token and write them to
    /// the config file, then exit.
    Init,
}
