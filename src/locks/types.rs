//! Stable file identity used to key lock claims.

use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::Path;

/// Filesystem identity of a pool file (device + inode on Unix).
///
/// Two paths naming the same file (hard links, symlinks, `..` segments)
/// resolve to the same identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FileIdentity {
    /// Device the file lives on.
    pub dev: u64,

    /// Inode number on that device.
    pub ino: u64,
}

impl FileIdentity {
    /// Resolve the identity of an open file.
    ///
    /// `path` is only consulted on hosts without inode numbers.
    #[cfg(unix)]
    pub fn of(file: &File, _path: &Path) -> io::Result<Self> {
        use std::os::unix::fs::MetadataExt;

        let meta = file.metadata()?;
        Ok(Self {
            dev: meta.dev(),
            ino: meta.ino(),
        })
    }

    /// Resolve the identity of an open file.
    ///
    /// Without inode numbers the canonical path stands in for the identity.
    #[cfg(not(unix))]
    pub fn of(_file: &File, path: &Path) -> io::Result<Self> {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let canonical = std::fs::canonicalize(path)?;
        let mut hasher = DefaultHasher::new();
        canonical.hash(&mut hasher);
        Ok(Self {
            dev: 0,
            ino: hasher.finish(),
        })
    }
}

impl std::fmt::Display for FileIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:x}:{}", self.dev, self.ino)
    }
}
