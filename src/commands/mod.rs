//! Command implementations for logpool.
//!
//! This module loads the configuration, builds the pool manager, and routes
//! CLI commands to their implementations.

mod create;
mod hold;
mod info;
mod open;

use crate::cli::{Cli, Command, NewPoolArgs};
use logpool::config::{Config, parse_mode};
use logpool::error::Result;
use logpool::pool::PoolManager;

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let manager = PoolManager::from_config(&config);

    match cli.command {
        Command::Create(args) => create::cmd_create(&manager, &config, args),
        Command::Open(args) => open::cmd_open(&manager, args),
        Command::Hold(args) => hold::cmd_hold(&manager, &config, args),
        Command::Info(args) => info::cmd_info(&manager, args),
    }
}

/// Size and permission bits for a new pool: flags first, then config.
fn new_pool_settings(config: &Config, args: &NewPoolArgs) -> Result<(u64, u32)> {
    let size = args.size.unwrap_or(config.pool_size);
    let mode = match &args.mode {
        Some(mode) => parse_mode(mode)?,
        None => config.mode_bits()?,
    };
    Ok((size, mode))
}
