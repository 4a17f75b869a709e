//! RAII lock claim implementation.

use super::{FileIdentity, FileLock};
use std::fs::File;
use std::io;
use std::sync::Arc;

/// RAII claim on an exclusively locked file.
///
/// The claim owns the open file. When dropped, the lock is released and the
/// file is closed. If the release fails during drop, a warning is logged but
/// no panic occurs; closing the descriptor still lets the host drop the lock.
#[derive(Debug)]
pub struct LockClaim {
    file: File,
    identity: FileIdentity,
    lock: Arc<dyn FileLock>,

    /// Process that acquired the claim. Copies inherited through `fork` are
    /// never unlocked by the child.
    owner_pid: u32,

    /// Whether the claim has been released manually.
    released: bool,
}

impl LockClaim {
    /// Take the exclusive claim on `file`, without blocking.
    ///
    /// On failure the file is closed and no claim is held.
    pub(crate) fn acquire(
        file: File,
        identity: FileIdentity,
        lock: Arc<dyn FileLock>,
    ) -> io::Result<Self> {
        lock.try_lock_exclusive(&file, identity)?;
        tracing::debug!(%identity, "lock claim acquired");
        Ok(Self {
            file,
            identity,
            lock,
            owner_pid: std::process::id(),
            released: false,
        })
    }

    /// The locked file.
    pub fn file(&self) -> &File {
        &self.file
    }

    /// Identity of the locked file.
    pub fn identity(&self) -> FileIdentity {
        self.identity
    }

    /// Whether the current process is the one that acquired this claim.
    pub fn is_owner(&self) -> bool {
        self.owner_pid == std::process::id()
    }

    /// Manually release the claim and close the file.
    ///
    /// In a process that merely inherited the claim, this only closes the
    /// inherited descriptor.
    pub fn release(mut self) -> io::Result<()> {
        self.released = true;
        if !self.is_owner() {
            return Ok(());
        }
        self.lock.unlock(&self.file, self.identity)?;
        tracing::debug!(identity = %self.identity, "lock claim released");
        Ok(())
    }
}

impl Drop for LockClaim {
    fn drop(&mut self) {
        if !self.released
            && self.is_owner()
            && let Err(e) = self.lock.unlock(&self.file, self.identity)
        {
            tracing::warn!(identity = %self.identity, error = %e, "failed to release lock claim");
        }
    }
}
