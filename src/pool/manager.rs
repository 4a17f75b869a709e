//! Pool create/open protocol.

use super::format::{HEADER_SIZE, MIN_POOL_SIZE, PoolHeader};
use super::handle::PoolHandle;
use crate::config::Config;
use crate::error::{PoolError, Result};
use crate::locks::{FileIdentity, FileLock, FlockLock, LockClaim};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

/// Distinguishes staging files created by concurrent threads of one process.
static STAGING_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unlocked staging files younger than this may belong to a creator that has
/// not taken its lock yet, and are left alone.
const STAGING_GRACE: Duration = Duration::from_secs(30);

/// Gatekeeper for pool files.
///
/// The manager keeps no state about open pools: exclusivity lives entirely in
/// the injected [`FileLock`], so it holds across processes and is dropped by
/// the host when a holder dies.
#[derive(Debug, Clone)]
pub struct PoolManager {
    lock: Arc<dyn FileLock>,
    sync_on_create: bool,
}

impl Default for PoolManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PoolManager {
    /// Manager backed by the host's advisory file lock.
    pub fn new() -> Self {
        Self::with_lock(Arc::new(FlockLock))
    }

    /// Manager backed by a custom lock capability.
    pub fn with_lock(lock: Arc<dyn FileLock>) -> Self {
        Self {
            lock,
            sync_on_create: true,
        }
    }

    /// Manager backed by the host lock, with settings taken from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new().sync_on_create(config.sync_on_create)
    }

    /// Whether `create` syncs the initialized pool to disk before publishing it.
    pub fn sync_on_create(mut self, sync: bool) -> Self {
        self.sync_on_create = sync;
        self
    }

    /// Create a new pool of `size` bytes at `path` and lock it.
    ///
    /// The pool is built under a private staging name, locked, initialized,
    /// and only then linked into place, so no other caller can ever observe
    /// it at `path` unlocked or half-written. Linking fails if `path` exists,
    /// which also settles two concurrent creates: the loser gets
    /// [`PoolError::AlreadyExists`].
    ///
    /// # Arguments
    ///
    /// * `path` - Where the pool is published
    /// * `size` - Pool size in bytes, at least [`MIN_POOL_SIZE`]
    /// * `mode` - Permission bits for the new file (ignored off Unix)
    ///
    /// # Returns
    ///
    /// * `Ok(PoolHandle)` - The pool exists at `path` and is locked by the handle
    /// * `Err(PoolError::AlreadyExists)` - Something already lives at `path`
    /// * `Err(PoolError::InvalidArgument)` - `size` is below the minimum
    pub fn create<P: AsRef<Path>>(&self, path: P, size: u64, mode: u32) -> Result<PoolHandle> {
        let path = path.as_ref();

        if size < MIN_POOL_SIZE {
            return Err(PoolError::InvalidArgument(format!(
                "pool size {} is below the minimum of {} bytes",
                size, MIN_POOL_SIZE
            )));
        }

        // Cheap early exit; the hard link below is the authoritative check.
        if path.symlink_metadata().is_ok() {
            return Err(PoolError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }

        self.sweep_orphaned_staging(path);

        let staging = staging_path(path)?;
        let file = create_new_file(&staging, mode).map_err(|e| {
            PoolError::from_io(path, &staging_context("failed to create", &staging), e)
        })?;

        let result = self.initialize_and_publish(file, &staging, path, size);
        // After a successful publish the staging name is already gone.
        if result.is_err() {
            let _ = fs::remove_file(&staging);
        }
        result
    }

    fn initialize_and_publish(
        &self,
        file: File,
        staging: &Path,
        path: &Path,
        size: u64,
    ) -> Result<PoolHandle> {
        let identity = FileIdentity::of(&file, staging).map_err(|e| {
            PoolError::from_io(path, &staging_context("failed to stat", staging), e)
        })?;
        let claim = LockClaim::acquire(file, identity, Arc::clone(&self.lock))
            .map_err(|e| PoolError::from_io(path, "failed to lock pool", e))?;

        let header = PoolHeader::new(size);
        write_header(claim.file(), &header, self.sync_on_create).map_err(|e| {
            PoolError::from_io(path, &staging_context("failed to initialize", staging), e)
        })?;

        fs::hard_link(staging, path)
            .map_err(|e| PoolError::from_io(path, "failed to publish pool", e))?;
        if let Err(e) = fs::remove_file(staging) {
            let _ = fs::remove_file(path);
            return Err(PoolError::from_io(
                path,
                &staging_context("failed to remove", staging),
                e,
            ));
        }

        let resolved = resolve(path)?;
        tracing::debug!(path = %resolved.display(), %identity, size, "pool created");
        Ok(PoolHandle::new(claim, header, resolved))
    }

    /// Open an existing pool at `path` and lock it.
    ///
    /// The lock attempt never waits: if another live handle, in this or any
    /// other process, holds the pool, this returns [`PoolError::Contention`]
    /// immediately. The header is validated only once the claim is held; a
    /// validation failure releases the claim before the error is returned.
    ///
    /// # Returns
    ///
    /// * `Ok(PoolHandle)` - The pool is locked by the returned handle
    /// * `Err(PoolError::Contention)` - Another handle holds the pool
    /// * `Err(PoolError::NotFound)` - No file at `path`
    /// * `Err(PoolError::InvalidFormat)` - The file is not a valid pool
    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<PoolHandle> {
        let path = path.as_ref();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::IsADirectory => {
                    PoolError::invalid_format(path, "not a regular file")
                }
                _ => PoolError::from_io(path, "failed to open pool", e),
            })?;
        let identity = FileIdentity::of(&file, path)
            .map_err(|e| PoolError::from_io(path, "failed to stat pool", e))?;
        let claim = LockClaim::acquire(file, identity, Arc::clone(&self.lock))
            .map_err(|e| PoolError::from_io(path, "failed to lock pool", e))?;

        let header = read_header(claim.file(), path)?;
        let resolved = resolve(path)?;
        tracing::debug!(path = %resolved.display(), %identity, "pool opened");
        Ok(PoolHandle::new(claim, header, resolved))
    }

    /// Remove staging files for `path` left behind by creators that died
    /// before publishing.
    ///
    /// A live creator holds the lock on its staging file, so only files this
    /// manager can lock, and that are older than [`STAGING_GRACE`], are
    /// removed. Failures are ignored; the sweep never blocks a create.
    fn sweep_orphaned_staging(&self, path: &Path) {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return;
        };
        let dir = staging_dir(path);
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !is_staging_name_for(name, file_name) {
                continue;
            }
            let candidate = entry.path();
            match self.remove_if_orphaned(&candidate) {
                Ok(true) => {
                    tracing::debug!(path = %candidate.display(), "removed orphaned staging file");
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::debug!(path = %candidate.display(), error = %e, "skipped staging file");
                }
            }
        }
    }

    fn remove_if_orphaned(&self, candidate: &Path) -> io::Result<bool> {
        let file = OpenOptions::new().read(true).write(true).open(candidate)?;
        let meta = file.metadata()?;
        if !meta.is_file() {
            return Ok(false);
        }
        let age = meta
            .modified()
            .ok()
            .and_then(|t| SystemTime::now().duration_since(t).ok())
            .unwrap_or_default();
        if age < STAGING_GRACE {
            return Ok(false);
        }

        let identity = FileIdentity::of(&file, candidate)?;
        let claim = match LockClaim::acquire(file, identity, Arc::clone(&self.lock)) {
            Ok(claim) => claim,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(false),
            Err(e) => return Err(e),
        };
        // Unlink while still holding the claim so no creator can be mid-publish.
        fs::remove_file(candidate)?;
        claim.release()?;
        Ok(true)
    }
}

fn staging_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Whether `name` has the shape `.<pool>.<pid>.<n>.tmp`.
fn is_staging_name_for(name: &str, pool: &str) -> bool {
    let Some(rest) = name
        .strip_prefix('.')
        .and_then(|n| n.strip_prefix(pool))
        .and_then(|n| n.strip_prefix('.'))
        .and_then(|n| n.strip_suffix(".tmp"))
    else {
        return false;
    };
    let mut parts = rest.split('.');
    let numeric = |part: Option<&str>| {
        part.is_some_and(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
    };
    numeric(parts.next()) && numeric(parts.next()) && parts.next().is_none()
}

fn staging_context(action: &str, staging: &Path) -> String {
    format!("{} staging file '{}' for pool", action, staging.display())
}

/// Sibling staging name: `.<name>.<pid>.<n>.tmp`.
fn staging_path(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            PoolError::InvalidArgument(format!("invalid pool path '{}'", path.display()))
        })?;
    let parent = staging_dir(path);

    let n = STAGING_COUNTER.fetch_add(1, Ordering::Relaxed);
    Ok(parent.join(format!(".{}.{}.{}.tmp", file_name, std::process::id(), n)))
}

fn create_new_file(path: &Path, mode: u32) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    options.open(path)
}

fn write_header(file: &File, header: &PoolHeader, sync: bool) -> io::Result<()> {
    file.set_len(header.pool_size)?;
    let mut writer = file;
    writer.seek(SeekFrom::Start(0))?;
    writer.write_all(&header.encode())?;
    if sync {
        file.sync_all()?;
    }
    Ok(())
}

fn read_header(file: &File, path: &Path) -> Result<PoolHeader> {
    let meta = file
        .metadata()
        .map_err(|e| PoolError::from_io(path, "failed to stat pool", e))?;
    if !meta.is_file() {
        return Err(PoolError::invalid_format(path, "not a regular file"));
    }
    if meta.len() < HEADER_SIZE {
        return Err(PoolError::invalid_format(
            path,
            format!("file is {} bytes, smaller than the pool header", meta.len()),
        ));
    }

    let mut buf = vec![0u8; HEADER_SIZE as usize];
    let mut reader = file;
    reader
        .seek(SeekFrom::Start(0))
        .and_then(|_| reader.read_exact(&mut buf))
        .map_err(|e| PoolError::from_io(path, "failed to read pool header", e))?;

    PoolHeader::decode(&buf, meta.len()).map_err(|reason| PoolError::invalid_format(path, reason))
}

fn resolve(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|e| PoolError::from_io(path, "failed to resolve pool path", e))
}
