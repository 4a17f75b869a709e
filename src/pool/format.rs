//! On-disk pool header.
//!
//! The header occupies the first [`HEADER_SIZE`] bytes of a pool file. All
//! integers are little-endian:
//!
//! | offset | size | field          |
//! |--------|------|----------------|
//! | 0      | 8    | signature      |
//! | 8      | 4    | major version  |
//! | 12     | 4    | flags          |
//! | 16     | 8    | pool size      |
//! | 24     | 8    | created at (unix seconds) |
//! | 32     | 8    | start offset   |
//! | 40     | 8    | write offset   |
//! | 48     | 8    | end offset     |
//! | 56     | 8    | checksum       |
//!
//! The remainder of the header is zero. The checksum is a Fletcher-64 sum
//! over the whole header with the checksum field zeroed.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Magic bytes at the start of every pool.
pub const POOL_SIGNATURE: [u8; 8] = *b"PMEMLOG\0";

/// Header layout version written by this crate.
pub const FORMAT_MAJOR: u32 = 1;

/// Size of the header region in bytes.
pub const HEADER_SIZE: u64 = 4096;

/// Smallest pool `create` accepts.
pub const MIN_POOL_SIZE: u64 = 2 * 1024 * 1024;

const CHECKSUM_OFFSET: usize = 56;

/// Decoded pool header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolHeader {
    /// Layout version.
    pub major: u32,

    /// Feature flags (none defined).
    pub flags: u32,

    /// Total pool size in bytes, header included.
    pub pool_size: u64,

    /// When the pool was created.
    pub created_at: DateTime<Utc>,

    /// First byte of the log area.
    pub start_offset: u64,

    /// Next byte the log will be written at.
    pub write_offset: u64,

    /// One past the last byte of the log area.
    pub end_offset: u64,
}

impl PoolHeader {
    /// Header for an empty pool of `pool_size` bytes.
    pub fn new(pool_size: u64) -> Self {
        // Sub-second precision is not stored on disk.
        let now = Utc::now();
        let created_at = DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now);
        Self {
            major: FORMAT_MAJOR,
            flags: 0,
            pool_size,
            created_at,
            start_offset: HEADER_SIZE,
            write_offset: HEADER_SIZE,
            end_offset: pool_size,
        }
    }

    /// Bytes available to the log.
    pub fn capacity(&self) -> u64 {
        self.end_offset.saturating_sub(self.start_offset)
    }

    /// Encode the header into its on-disk form, checksum included.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_SIZE as usize];
        buf[0..8].copy_from_slice(&POOL_SIGNATURE);
        buf[8..12].copy_from_slice(&self.major.to_le_bytes());
        buf[12..16].copy_from_slice(&self.flags.to_le_bytes());
        buf[16..24].copy_from_slice(&self.pool_size.to_le_bytes());
        buf[24..32].copy_from_slice(&(self.created_at.timestamp() as u64).to_le_bytes());
        buf[32..40].copy_from_slice(&self.start_offset.to_le_bytes());
        buf[40..48].copy_from_slice(&self.write_offset.to_le_bytes());
        buf[48..56].copy_from_slice(&self.end_offset.to_le_bytes());

        let sum = checksum(&buf);
        buf[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 8].copy_from_slice(&sum.to_le_bytes());
        buf
    }

    /// Decode and validate a header read from a file of `file_len` bytes.
    ///
    /// Returns a human-readable reason when the bytes do not describe a
    /// usable pool.
    pub fn decode(buf: &[u8], file_len: u64) -> Result<Self, String> {
        if buf.len() < HEADER_SIZE as usize {
            return Err(format!(
                "header is {} bytes, expected {}",
                buf.len(),
                HEADER_SIZE
            ));
        }
        let buf = &buf[..HEADER_SIZE as usize];

        if buf[0..8] != POOL_SIGNATURE {
            return Err("bad signature".to_string());
        }

        let stored = read_u64(buf, CHECKSUM_OFFSET);
        let computed = checksum(buf);
        if stored != computed {
            return Err(format!(
                "header checksum mismatch (stored {:#018x}, computed {:#018x})",
                stored, computed
            ));
        }

        let major = read_u32(buf, 8);
        if major != FORMAT_MAJOR {
            return Err(format!("unsupported format version {}", major));
        }

        let pool_size = read_u64(buf, 16);
        if pool_size != file_len {
            return Err(format!(
                "pool size {} does not match file size {}",
                pool_size, file_len
            ));
        }

        let created_secs = read_u64(buf, 24);
        let created_at = i64::try_from(created_secs)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| format!("invalid creation time {}", created_secs))?;

        let start_offset = read_u64(buf, 32);
        let write_offset = read_u64(buf, 40);
        let end_offset = read_u64(buf, 48);
        if start_offset < HEADER_SIZE
            || start_offset > write_offset
            || write_offset > end_offset
            || end_offset != pool_size
        {
            return Err(format!(
                "inconsistent log offsets (start {}, write {}, end {}, size {})",
                start_offset, write_offset, end_offset, pool_size
            ));
        }

        Ok(Self {
            major,
            flags: read_u32(buf, 12),
            pool_size,
            created_at,
            start_offset,
            write_offset,
            end_offset,
        })
    }
}

/// Fletcher-64 over 32-bit little-endian words, skipping the checksum field.
fn checksum(buf: &[u8]) -> u64 {
    let mut lo: u32 = 0;
    let mut hi: u32 = 0;
    for (i, word) in buf.chunks_exact(4).enumerate() {
        let offset = i * 4;
        let value = if (CHECKSUM_OFFSET..CHECKSUM_OFFSET + 8).contains(&offset) {
            0
        } else {
            u32::from_le_bytes([word[0], word[1], word[2], word[3]])
        };
        lo = lo.wrapping_add(value);
        hi = hi.wrapping_add(lo);
    }
    (u64::from(hi) << 32) | u64::from(lo)
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}

fn read_u64(buf: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[offset..offset + 8]);
    u64::from_le_bytes(bytes)
}
