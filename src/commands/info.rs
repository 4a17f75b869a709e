//! Implementation of the `logpool info` command.

use crate::cli::InfoArgs;
use logpool::error::{PoolError, Result};
use logpool::locks::FileIdentity;
use logpool::pool::{PoolHeader, PoolManager};
use serde::Serialize;
use std::path::Path;

/// Pool description printed by `info --json`.
#[derive(Debug, Serialize)]
struct InfoReport<'a> {
    path: &'a Path,
    identity: FileIdentity,
    capacity: u64,
    header: &'a PoolHeader,
}

pub fn cmd_info(manager: &PoolManager, args: InfoArgs) -> Result<()> {
    let handle = manager.open(&args.path)?;
    let header = handle.header();

    if args.json {
        let report = InfoReport {
            path: handle.path(),
            identity: handle.identity(),
            capacity: header.capacity(),
            header,
        };
        let json = serde_json::to_string_pretty(&report).map_err(|e| {
            PoolError::io("failed to serialize pool info", std::io::Error::other(e))
        })?;
        println!("{}", json);
    } else {
        println!("Pool:      {}", handle.path().display());
        println!("File:      {}", handle.identity());
        println!("Version:   {}", header.major);
        println!("Size:      {} bytes", header.pool_size);
        println!("Created:   {}", header.created_at.to_rfc3339());
        println!(
            "Log:       {}..{} (write offset {}, {} bytes free)",
            header.start_offset,
            header.end_offset,
            header.write_offset,
            header.end_offset - header.write_offset
        );
    }

    handle.close()
}
