//! Exit code constants for the logpool CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, missing pool, pool already exists)
//! - 2: Invalid pool format
//! - 3: I/O failure
//! - 4: Contention (the pool is held by another handle)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, missing pool file, or existing pool on create.
pub const USER_ERROR: i32 = 1;

/// The file exists but is not a valid log pool.
pub const FORMAT_FAILURE: i32 = 2;

/// The host environment failed an I/O operation.
pub const IO_FAILURE: i32 = 3;

/// The pool is locked by another live handle.
pub const CONTENTION: i32 = 4;
