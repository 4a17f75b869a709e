//! Cross-process tests driving the `logpool` binary.

use logpool::{MIN_POOL_SIZE, PoolError, PoolManager};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Output, Stdio};
use tempfile::TempDir;

const LOGPOOL: &str = env!("CARGO_BIN_EXE_logpool");

fn logpool(args: &[&str]) -> Output {
    Command::new(LOGPOOL)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run logpool {}: {}", args.join(" "), e))
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

/// Start `logpool hold` and wait until it reports the pool as held.
fn spawn_holder(path: &Path, create: bool) -> Child {
    let mut cmd = Command::new(LOGPOOL);
    cmd.arg("hold").arg(path);
    if create {
        cmd.arg("--create");
    }
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn logpool hold");

    let stdout: ChildStdout = child.stdout.take().unwrap();
    let mut line = String::new();
    BufReader::new(stdout).read_line(&mut line).unwrap();
    assert!(line.starts_with("ready "), "unexpected holder output: {:?}", line);
    child
}

#[test]
fn test_open_in_other_process_reports_contention() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("poolB");

    let handle = logpool::create(&path, MIN_POOL_SIZE, 0o600).unwrap();

    let output = logpool(&["open", path_str(&path)]);
    assert_eq!(output.status.code(), Some(logpool::exit_codes::CONTENTION));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("locked by another handle"), "stderr: {}", stderr);
    assert!(logpool::open(&path).unwrap_err().is_contention());

    logpool::close(handle).unwrap();

    let output = logpool(&["open", path_str(&path)]);
    assert!(output.status.success());
}

#[test]
fn test_holder_process_excludes_this_process() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pool");

    let mut holder = spawn_holder(&path, true);

    let err = PoolManager::new().open(&path).unwrap_err();
    assert!(err.is_contention());
    let output = logpool(&["info", path_str(&path)]);
    assert_eq!(output.status.code(), Some(logpool::exit_codes::CONTENTION));

    // Closing stdin makes the holder close its handle and exit cleanly.
    drop(holder.stdin.take());
    assert!(holder.wait().unwrap().success());

    PoolManager::new().open(&path).unwrap().close().unwrap();
}

#[test]
fn test_killed_holder_releases_pool() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pool");
    PoolManager::new()
        .create(&path, MIN_POOL_SIZE, 0o600)
        .unwrap()
        .close()
        .unwrap();

    let mut holder = spawn_holder(&path, false);
    assert!(PoolManager::new().open(&path).unwrap_err().is_contention());

    // No cleanup code runs in the holder; the host drops its lock.
    holder.kill().unwrap();
    holder.wait().unwrap();

    let handle = PoolManager::new().open(&path).unwrap();
    handle.close().unwrap();
}

#[test]
fn test_create_command_refuses_existing_pool() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pool");

    let output = logpool(&["create", path_str(&path)]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Created pool"));

    let output = logpool(&["create", path_str(&path)]);
    assert_eq!(output.status.code(), Some(logpool::exit_codes::USER_ERROR));
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));
}

#[test]
fn test_create_command_uses_config_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pool");
    let config = temp_dir.path().join("logpool.yaml");
    std::fs::write(&config, format!("pool_size: {}\n", MIN_POOL_SIZE * 2)).unwrap();

    let output = logpool(&["create", path_str(&path), "--config", path_str(&config)]);
    assert!(output.status.success(), "{:?}", output);
    assert_eq!(std::fs::metadata(&path).unwrap().len(), MIN_POOL_SIZE * 2);
}

#[test]
fn test_info_json_describes_pool() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pool");
    logpool(&["create", path_str(&path)]);

    let output = logpool(&["info", path_str(&path), "--json"]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["header"]["pool_size"], MIN_POOL_SIZE);
    assert_eq!(report["header"]["major"], 1);
    assert_eq!(report["capacity"], MIN_POOL_SIZE - 4096);
}

#[test]
fn test_open_command_on_garbage_reports_format_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pool");
    std::fs::write(&path, vec![0xa5u8; 8192]).unwrap();

    let output = logpool(&["open", path_str(&path)]);
    assert_eq!(output.status.code(), Some(logpool::exit_codes::FORMAT_FAILURE));

    let err = PoolManager::new().open(&path).unwrap_err();
    assert!(matches!(err, PoolError::InvalidFormat { .. }));
}
