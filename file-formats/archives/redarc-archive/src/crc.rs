//! CRC32 checksums for archive payloads
//!
//! Checksums are persisted in copy records, so the parameters are
//! load-bearing: IEEE reflected CRC32 (polynomial 0xEDB88320, initial value
//! 0xFFFFFFFF, final XOR 0xFFFFFFFF), as implemented by `crc32fast`.
//! `crc32fast::Hasher` is the single incremental primitive; both variants
//! below fold every chunk into one running hasher.

use crate::Result;
use std::io::Read;

/// Chunk size for streaming reads
pub(crate) const CHUNK_SIZE: usize = 4096;

/// Compute the CRC32 of an in-memory buffer
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Compute the CRC32 of everything remaining in `reader`
pub fn crc32_reader<R: Read>(reader: &mut R) -> Result<u32> {
    let mut hasher = crc32fast::Hasher::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize())
}
