use crate::locks::{FileIdentity, FileLock, MemoryLockTable};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Switches the working directory for the guard's lifetime.
pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // The working directory is process-global; serialize even if a
        // #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Scratch directory and a not-yet-existing pool path inside it.
pub(crate) fn scratch_pool(name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    (temp_dir, path)
}

/// Names of leftover staging files in `dir`.
pub(crate) fn staging_files(dir: &TempDir) -> Vec<String> {
    std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with('.') && name.ends_with(".tmp"))
        .collect()
}

/// Lock capability whose release always fails.
#[derive(Debug, Default)]
pub(crate) struct StuckLock;

impl FileLock for StuckLock {
    fn try_lock_exclusive(&self, _file: &File, _identity: FileIdentity) -> io::Result<()> {
        Ok(())
    }

    fn unlock(&self, _file: &File, _identity: FileIdentity) -> io::Result<()> {
        Err(io::Error::other("unlock refused"))
    }
}

/// Lock capability that plants a file at `target` while locking, so the
/// caller loses the publish race after its claim is taken.
#[derive(Debug)]
pub(crate) struct PublishRaceLock {
    pub(crate) table: MemoryLockTable,
    pub(crate) target: PathBuf,
}

impl FileLock for PublishRaceLock {
    fn try_lock_exclusive(&self, file: &File, identity: FileIdentity) -> io::Result<()> {
        if !self.target.exists() {
            std::fs::write(&self.target, b"someone else's pool")?;
        }
        self.table.try_lock_exclusive(file, identity)
    }

    fn unlock(&self, file: &File, identity: FileIdentity) -> io::Result<()> {
        self.table.unlock(file, identity)
    }
}

/// Write an empty staging-style file at `dir/name`, last modified `age` ago.
pub(crate) fn stale_file(dir: &Path, name: &str, age: std::time::Duration) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    file.set_modified(std::time::SystemTime::now() - age).unwrap();
    path
}
