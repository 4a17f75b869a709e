//! logpool: persistent log pool files with single-holder exclusivity.
//!
//! At most one live [`PoolHandle`], in any process on the host, may hold a
//! given pool. Exclusivity is enforced with a non-blocking, file-scoped lock
//! claim taken when a pool is created or opened and released when the handle
//! is closed, dropped, or its process dies.
//!
//! ```no_run
//! use logpool::{MIN_POOL_SIZE, PoolManager};
//!
//! let manager = PoolManager::new();
//! let pool = manager.create("/tmp/poolA", MIN_POOL_SIZE, 0o600)?;
//! assert!(manager.open("/tmp/poolA").unwrap_err().is_contention());
//! pool.close()?;
//! # Ok::<(), logpool::PoolError>(())
//! ```

pub mod config;
pub mod error;
pub mod exit_codes;
pub mod locks;
pub mod pool;

#[cfg(test)]
mod test_support;

use std::path::Path;

pub use config::Config;
pub use error::{PoolError, Result};
pub use locks::{FileIdentity, FileLock, FlockLock, MemoryLockTable};
pub use pool::{MIN_POOL_SIZE, PoolHandle, PoolHeader, PoolManager};

/// Create a pool at `path` using the host file lock.
pub fn create<P: AsRef<Path>>(path: P, size: u64, mode: u32) -> Result<PoolHandle> {
    PoolManager::new().create(path, size, mode)
}

/// Open the pool at `path` using the host file lock.
pub fn open<P: AsRef<Path>>(path: P) -> Result<PoolHandle> {
    PoolManager::new().open(path)
}

/// Close `handle`, releasing its lock claim.
pub fn close(handle: PoolHandle) -> Result<()> {
    handle.close()
}
