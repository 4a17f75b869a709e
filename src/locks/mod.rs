//! Locking subsystem for logpool.
//!
//! A pool's exclusivity is enforced by a lock claim on the *open file*, not on
//! the path string and not in an in-process registry. The claim is taken with
//! a non-blocking exclusive request and released when the claim is dropped,
//! or by the kernel when the owning process dies.
//!
//! # Lock Capability
//!
//! The lock primitive is injected through the [`FileLock`] trait:
//! - [`FlockLock`]: the host's advisory file lock (`flock(LOCK_EX | LOCK_NB)`
//!   on Unix via `fs2`). Scoped to the open file description and keyed by the
//!   inode, so hard links and symlinks cannot bypass it.
//! - [`MemoryLockTable`]: an in-process table keyed by [`FileIdentity`].
//!   Managers sharing one table behave like unrelated processes contending on
//!   the same host, which keeps protocol tests free of real process spawning.
//!
//! # RAII Claims
//!
//! [`LockClaim`] owns the open file and releases the lock when dropped. Only
//! the process that acquired a claim ever unlocks it; a forked child dropping
//! its inherited copy only closes its own descriptor.

mod flock;
mod guard;
mod memory;
mod types;


use std::fs::File;
use std::io;

// Re-export public API
pub use flock::FlockLock;
pub use guard::LockClaim;
pub use memory::MemoryLockTable;
pub use types::FileIdentity;

/// An exclusive, non-blocking, file-scoped lock primitive.
///
/// Contention must be reported as an `io::Error` of kind
/// `io::ErrorKind::WouldBlock`; the attempt must never wait.
pub trait FileLock: Send + Sync + std::fmt::Debug {
    /// Try to take the exclusive claim on `file`.
    fn try_lock_exclusive(&self, file: &File, identity: FileIdentity) -> io::Result<()>;

    /// Release a claim previously taken on `file`.
    fn unlock(&self, file: &File, identity: FileIdentity) -> io::Result<()>;
}
