//! The caller-visible result of a successful create or open.

use super::format::PoolHeader;
use crate::error::{PoolError, Result};
use crate::locks::{FileIdentity, LockClaim};
use std::path::{Path, PathBuf};

/// An open pool holding the exclusive lock claim.
///
/// A handle is neither `Clone` nor shareable. [`PoolHandle::close`] consumes
/// it; dropping it without closing releases the claim as well.
#[derive(Debug)]
pub struct PoolHandle {
    claim: LockClaim,
    header: PoolHeader,

    /// Canonical path the pool was opened through.
    path: PathBuf,
}

impl PoolHandle {
    pub(super) fn new(claim: LockClaim, header: PoolHeader, path: PathBuf) -> Self {
        Self {
            claim,
            header,
            path,
        }
    }

    /// Canonical path of the pool file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Filesystem identity the claim is held on.
    pub fn identity(&self) -> FileIdentity {
        self.claim.identity()
    }

    /// The pool header as validated at create/open time.
    pub fn header(&self) -> &PoolHeader {
        &self.header
    }

    /// Total pool size in bytes.
    pub fn pool_size(&self) -> u64 {
        self.header.pool_size
    }

    /// Release the lock claim and close the pool file.
    ///
    /// A release failure is an environment failure and is reported as
    /// [`PoolError::Io`]; the descriptor is closed regardless.
    pub fn close(self) -> Result<()> {
        let PoolHandle { claim, path, .. } = self;
        claim.release().map_err(|e| {
            PoolError::io(format!("failed to release pool '{}'", path.display()), e)
        })?;
        tracing::debug!(path = %path.display(), "pool closed");
        Ok(())
    }
}
