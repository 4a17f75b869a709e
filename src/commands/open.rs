//! Implementation of the `logpool open` command.

use crate::cli::PathArgs;
use logpool::error::Result;
use logpool::pool::PoolManager;

pub fn cmd_open(manager: &PoolManager, args: PathArgs) -> Result<()> {
    let handle = manager.open(&args.path)?;
    println!(
        "Opened pool '{}' (file {})",
        handle.path().display(),
        handle.identity()
    );
    handle.close()
}
