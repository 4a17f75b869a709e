//! Configuration defaults and value parsing.

use crate::error::{PoolError, Result};
use crate::pool::MIN_POOL_SIZE;

/// Largest permission value accepted for new pools (`07777`).
pub const MAX_MODE: u32 = 0o7777;

/// Parse octal permission bits such as `"0600"`, `"600"` or `"0o600"`.
pub fn parse_mode(s: &str) -> Result<u32> {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix("0o").unwrap_or(trimmed);
    let mode = u32::from_str_radix(digits, 8)
        .map_err(|_| PoolError::InvalidArgument(format!("invalid permission mode '{}'", s)))?;
    if mode > MAX_MODE {
        return Err(PoolError::InvalidArgument(format!(
            "permission mode '{}' is out of range",
            s
        )));
    }
    Ok(mode)
}

// Default value functions for serde

pub(crate) fn default_pool_size() -> u64 {
    MIN_POOL_SIZE
}
pub(crate) fn default_mode() -> String {
    "0600".to_string()
}
pub(crate) fn default_true() -> bool {
    true
}
