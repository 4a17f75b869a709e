//! CLI argument parsing for logpool.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// logpool: exclusive-access persistent log pools.
///
/// Every command locks the pool before touching it. If another process (or
/// another handle in the same process) holds the pool, the command fails
/// immediately with exit code 4.
#[derive(Parser, Debug)]
#[command(name = "logpool")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// YAML config file supplying defaults for new pools.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Available commands for logpool.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new pool, then close it.
    Create(CreateArgs),

    /// Open an existing pool, then close it.
    ///
    /// Useful as a probe: exits with code 4 while another handle holds the pool.
    Open(PathArgs),

    /// Create or open a pool and hold it until stdin is closed.
    ///
    /// Prints `ready <path>` on stdout once the pool is held.
    Hold(HoldArgs),

    /// Print the header of a pool.
    Info(InfoArgs),
}

/// Options for pools created by a command.
#[derive(Args, Debug, Default)]
pub struct NewPoolArgs {
    /// Pool size in bytes (default from config).
    #[arg(long)]
    pub size: Option<u64>,

    /// Octal permission bits, e.g. 0600 (default from config).
    #[arg(long)]
    pub mode: Option<String>,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Path of the pool to create.
    pub path: PathBuf,

    #[command(flatten)]
    pub pool: NewPoolArgs,
}

#[derive(Args, Debug)]
pub struct PathArgs {
    /// Path of the pool.
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct HoldArgs {
    /// Path of the pool.
    pub path: PathBuf,

    /// Create the pool instead of opening an existing one.
    #[arg(long)]
    pub create: bool,

    #[command(flatten)]
    pub pool: NewPoolArgs,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Path of the pool.
    pub path: PathBuf,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_with_overrides() {
        let cli = Cli::try_parse_from([
            "logpool", "create", "/tmp/pool", "--size", "4194304", "--mode", "0640",
        ])
        .unwrap();
        match cli.command {
            Command::Create(args) => {
                assert_eq!(args.path, PathBuf::from("/tmp/pool"));
                assert_eq!(args.pool.size, Some(4194304));
                assert_eq!(args.pool.mode.as_deref(), Some("0640"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parses_global_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["logpool", "hold", "/tmp/pool", "--create", "--config", "c.yaml"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.yaml")));
        match cli.command {
            Command::Hold(args) => assert!(args.create),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn open_requires_path() {
        assert!(Cli::try_parse_from(["logpool", "open"]).is_err());
    }
}
