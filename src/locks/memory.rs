//! In-process lock table for exercising the pool protocol without the host lock.

use super::{FileIdentity, FileLock};
use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

/// A lock table keyed by [`FileIdentity`].
///
/// Clones share the same table. Each `PoolManager` built on a clone acts as
/// an independent contender: a claim held through one is visible as
/// contention through every other.
#[derive(Debug, Clone, Default)]
pub struct MemoryLockTable {
    held: Arc<Mutex<HashSet<FileIdentity>>>,
}

impl MemoryLockTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a claim on `identity` is currently held.
    pub fn is_held(&self, identity: FileIdentity) -> bool {
        self.table().contains(&identity)
    }

    /// Number of claims currently held.
    pub fn held_count(&self) -> usize {
        self.table().len()
    }

    fn table(&self) -> MutexGuard<'_, HashSet<FileIdentity>> {
        // A panicking holder cannot leave the set half-updated.
        self.held.lock().unwrap_or_else(|poison| poison.into_inner())
    }
}

impl FileLock for MemoryLockTable {
    fn try_lock_exclusive(&self, _file: &File, identity: FileIdentity) -> io::Result<()> {
        if self.table().insert(identity) {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::WouldBlock,
                format!("file {} is already locked", identity),
            ))
        }
    }

    fn unlock(&self, _file: &File, identity: FileIdentity) -> io::Result<()> {
        if self.table().remove(&identity) {
            Ok(())
        } else {
            Err(io::Error::other(format!("file {} is not locked", identity)))
        }
    }
}
