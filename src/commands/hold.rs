//! Implementation of the `logpool hold` command.
//!
//! Holds a pool open for another process to contend with. The claim is kept
//! until stdin reaches end-of-file; killing the process releases it as well.

use super::new_pool_settings;
use crate::cli::HoldArgs;
use logpool::config::Config;
use logpool::error::{PoolError, Result};
use logpool::pool::PoolManager;
use std::io::{self, Read, Write};

pub fn cmd_hold(manager: &PoolManager, config: &Config, args: HoldArgs) -> Result<()> {
    let handle = if args.create {
        let (size, mode) = new_pool_settings(config, &args.pool)?;
        manager.create(&args.path, size, mode)?
    } else {
        manager.open(&args.path)?
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "ready {}", handle.path().display())
        .and_then(|_| stdout.flush())
        .map_err(|e| PoolError::io("failed to write to stdout", e))?;
    drop(stdout);

    // Block until whoever started us closes our stdin.
    let mut sink = Vec::new();
    io::stdin()
        .read_to_end(&mut sink)
        .map_err(|e| PoolError::io("failed to read stdin", e))?;

    handle.close()
}
