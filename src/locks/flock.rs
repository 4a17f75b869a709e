//! Host advisory file lock backed by `fs2`.

use super::{FileIdentity, FileLock};
use std::fs::File;
use std::io;

/// The host's exclusive advisory file lock.
///
/// On Unix this is `flock(2)`: the claim belongs to the open file description,
/// conflicts with any other description of the same inode (including ones
/// opened by this process), and disappears when the last descriptor closes.
/// On Windows it is `LockFileEx` over the whole file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlockLock;

impl FileLock for FlockLock {
    fn try_lock_exclusive(&self, file: &File, _identity: FileIdentity) -> io::Result<()> {
        fs2::FileExt::try_lock_exclusive(file).map_err(normalize_contention)
    }

    fn unlock(&self, file: &File, _identity: FileIdentity) -> io::Result<()> {
        fs2::FileExt::unlock(file)
    }
}

/// Report the platform's "lock is held" error as `WouldBlock`.
///
/// Windows signals contention with `ERROR_LOCK_VIOLATION`, which std does not
/// map to any `ErrorKind`.
fn normalize_contention(e: io::Error) -> io::Error {
    let contended = fs2::lock_contended_error().raw_os_error();
    if e.kind() != io::ErrorKind::WouldBlock
        && e.raw_os_error().is_some()
        && e.raw_os_error() == contended
    {
        return io::Error::new(io::ErrorKind::WouldBlock, e);
    }
    e
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contended_error_reads_as_would_block() {
        let e = normalize_contention(fs2::lock_contended_error());
        assert_eq!(e.kind(), io::ErrorKind::WouldBlock);
    }

    #[test]
    fn unrelated_errors_pass_through() {
        let e = normalize_contention(io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(e.kind(), io::ErrorKind::PermissionDenied);

        let e = normalize_contention(io::Error::from_raw_os_error(2));
        assert_eq!(e.kind(), io::ErrorKind::NotFound);
    }
}
