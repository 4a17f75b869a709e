//! Implementation of the `logpool create` command.

use super::new_pool_settings;
use crate::cli::CreateArgs;
use logpool::config::Config;
use logpool::error::Result;
use logpool::pool::PoolManager;

pub fn cmd_create(manager: &PoolManager, config: &Config, args: CreateArgs) -> Result<()> {
    let (size, mode) = new_pool_settings(config, &args.pool)?;
    let handle = manager.create(&args.path, size, mode)?;

    println!(
        "Created pool '{}' ({} bytes, mode {:04o})",
        handle.path().display(),
        handle.pool_size(),
        mode
    );
    handle.close()
}
