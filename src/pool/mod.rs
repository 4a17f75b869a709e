//! Log pools and their exclusive-access protocol.
//!
//! A pool is a single file holding a persistent log. Its contents carry no
//! concurrency control of their own, so [`PoolManager`] refuses to hand out a
//! [`PoolHandle`] unless it has staked an exclusive lock claim on the file:
//!
//! - `create` builds, locks, and initializes the pool before it becomes
//!   visible at its path.
//! - `open` takes the claim without blocking and reports
//!   [`PoolError::Contention`](crate::error::PoolError::Contention) if any
//!   other live handle holds it.
//! - `close` (or dropping the handle, or the process dying) releases it.

mod format;
mod handle;
mod manager;


// Re-export public API
pub use format::{FORMAT_MAJOR, HEADER_SIZE, MIN_POOL_SIZE, POOL_SIGNATURE, PoolHeader};
pub use handle::PoolHandle;
pub use manager::PoolManager;
