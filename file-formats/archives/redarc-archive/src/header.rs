//! Archive header parsing and writing
//!
//! Version 1 layout, little-endian throughout:
//!
//! ```text
//! offset  size  field
//! 0       8     magic        "REDARC\x1A\0"
//! 8       1     version      1
//! 9       8     meta_offset  i64, absolute offset of the metadata block
//! 17      4     file_count   i32
//! ```
//!
//! The payload region starts at [`HEADER_SIZE`]; the metadata block runs
//! from `meta_offset` to end of file.

use crate::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// Archive file magic ("REDARC" + 0x1A + NUL)
pub const ARCHIVE_MAGIC: [u8; 8] = *b"REDARC\x1a\0";

/// Current archive format version
pub const FORMAT_VERSION: u8 = 1;

/// On-disk header size in bytes
pub const HEADER_SIZE: u64 = 21;

/// Parsed archive header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveHeader {
    /// Absolute offset of the metadata block
    pub meta_offset: u64,
    /// Number of logical files in the archive
    pub file_count: u32,
}

impl ArchiveHeader {
    /// Placeholder header written before payload offsets are known.
    ///
    /// `meta_offset` is zero until the final header rewrite, which keeps a
    /// half-written temp file recognizably incomplete.
    pub fn placeholder(file_count: u32) -> Self {
        Self {
            meta_offset: 0,
            file_count,
        }
    }

    /// Read and validate a header
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic)?;
        if magic != ARCHIVE_MAGIC {
            return Err(Error::invalid_format("bad archive magic"));
        }

        let version = reader.read_u8()?;
        if version != FORMAT_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        let meta_offset = reader.read_i64::<LittleEndian>()?;
        let file_count = reader.read_i32::<LittleEndian>()?;
        if meta_offset < HEADER_SIZE as i64 {
            return Err(Error::invalid_format(format!(
                "metadata offset {meta_offset} overlaps the header"
            )));
        }
        if file_count < 0 {
            return Err(Error::invalid_format(format!(
                "negative file count {file_count}"
            )));
        }

        Ok(Self {
            meta_offset: meta_offset as u64,
            file_count: file_count as u32,
        })
    }

    /// Write the header at the current stream position
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&ARCHIVE_MAGIC)?;
        writer.write_u8(FORMAT_VERSION)?;
        writer.write_i64::<LittleEndian>(self.meta_offset as i64)?;
        writer.write_i32::<LittleEndian>(self.file_count as i32)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn roundtrip(header: ArchiveHeader) -> ArchiveHeader {
        let mut buf = Vec::new();
        header.write(&mut buf).unwrap();
        assert_eq!(buf.len() as u64, HEADER_SIZE);
        ArchiveHeader::read(&mut Cursor::new(buf)).unwrap()
    }

    #[test]
    fn test_header_roundtrip() {
        let header = ArchiveHeader {
            meta_offset: 12_345,
            file_count: 7,
        };
        assert_eq!(roundtrip(header), header);
    }

    #[test]
    fn test_empty_archive_header() {
        // Zero files still leaves the metadata block directly after the header
        let header = ArchiveHeader {
            meta_offset: HEADER_SIZE,
            file_count: 0,
        };
        assert_eq!(roundtrip(header), header);
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut buf = Vec::new();
        ArchiveHeader {
            meta_offset: 100,
            file_count: 1,
        }
        .write(&mut buf)
        .unwrap();
        buf[0] = b'X';
        assert!(matches!(
            ArchiveHeader::read(&mut Cursor::new(buf)),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut buf = Vec::new();
        ArchiveHeader {
            meta_offset: 100,
            file_count: 1,
        }
        .write(&mut buf)
        .unwrap();
        buf[8] = 2;
        assert!(matches!(
            ArchiveHeader::read(&mut Cursor::new(buf)),
            Err(Error::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_truncated_header_rejected() {
        let buf = ARCHIVE_MAGIC.to_vec();
        assert!(matches!(
            ArchiveHeader::read(&mut Cursor::new(buf)),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_meta_offset_inside_header_rejected() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&ARCHIVE_MAGIC);
        buf.push(FORMAT_VERSION);
        buf.extend_from_slice(&5i64.to_le_bytes());
        buf.extend_from_slice(&0i32.to_le_bytes());
        assert!(matches!(
            ArchiveHeader::read(&mut Cursor::new(buf)),
            Err(Error::InvalidFormat(_))
        ));
    }
}
