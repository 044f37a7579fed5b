//! File table and copy table model with fixed-width serializers
//!
//! The metadata block at the tail of an archive is, for each logical file,
//! one 288-byte file record followed by `copies` 20-byte copy records. All
//! integers are little-endian; the name field is 256 bytes of NUL-padded
//! UTF-8 (at most 255 name bytes, truncated at a character boundary).

use crate::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// Maximum number of copies stored per file
pub const MAX_REDUNDANCY: u32 = 10;

/// Size of the fixed name field
pub const NAME_FIELD_LEN: usize = 256;

/// On-disk size of a file record (without its copy records)
pub const FILE_RECORD_LEN: u64 = 288;

/// On-disk size of one copy record
pub const COPY_RECORD_LEN: u64 = 20;

/// Location and checksum of one stored copy of a file's payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyRecord {
    /// CRC32 of the copy's payload bytes
    pub crc: u32,
    /// Absolute byte offset of the payload within the archive
    pub offset: u64,
    /// Payload length in bytes
    pub size: u64,
}

impl CopyRecord {
    /// Read one copy record
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let crc = reader.read_u32::<LittleEndian>()?;
        let offset = reader.read_i64::<LittleEndian>()?;
        let size = reader.read_i64::<LittleEndian>()?;
        if offset < 0 || size < 0 {
            return Err(Error::invalid_format(format!(
                "negative copy geometry (offset {offset}, size {size})"
            )));
        }
        Ok(Self {
            crc,
            offset: offset as u64,
            size: size as u64,
        })
    }

    /// Write one copy record
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<LittleEndian>(self.crc)?;
        writer.write_i64::<LittleEndian>(self.offset as i64)?;
        writer.write_i64::<LittleEndian>(self.size as i64)?;
        Ok(())
    }

    /// Exclusive end offset of this copy's payload
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }
}

/// Per-file metadata: identity, filesystem attributes, and the copy table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Name under which the file is stored and extracted
    pub name: String,
    /// Filesystem mode bits captured at archive time
    pub mode: u32,
    /// Owner id
    pub uid: u32,
    /// Group id
    pub gid: u32,
    /// Access time, POSIX seconds
    pub atime: i64,
    /// Modification time, POSIX seconds
    pub mtime: i64,
    /// Copy table, one entry per stored replica
    pub copies: Vec<CopyRecord>,
}

impl FileRecord {
    /// Read one file record and its copy table.
    ///
    /// The copy count is bounds-checked before anything is allocated so a
    /// hostile archive cannot request an absurd table.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut name_buf = [0u8; NAME_FIELD_LEN];
        reader.read_exact(&mut name_buf)?;
        let name_len = name_buf
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(NAME_FIELD_LEN - 1);
        let name = std::str::from_utf8(&name_buf[..name_len])
            .map_err(|_| Error::invalid_format("file name is not valid UTF-8"))?
            .to_string();

        let mode = reader.read_u32::<LittleEndian>()?;
        let uid = reader.read_u32::<LittleEndian>()?;
        let gid = reader.read_u32::<LittleEndian>()?;
        let atime = reader.read_i64::<LittleEndian>()?;
        let mtime = reader.read_i64::<LittleEndian>()?;

        let copy_count = reader.read_i32::<LittleEndian>()?;
        if copy_count < 1 || copy_count as u32 > MAX_REDUNDANCY {
            return Err(Error::invalid_format(format!(
                "copy count {copy_count} for '{name}' outside 1..={MAX_REDUNDANCY}"
            )));
        }

        let mut copies = Vec::with_capacity(copy_count as usize);
        for _ in 0..copy_count {
            copies.push(CopyRecord::read(reader)?);
        }

        Ok(Self {
            name,
            mode,
            uid,
            gid,
            atime,
            mtime,
            copies,
        })
    }

    /// Write this record and its copy table
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut name_buf = [0u8; NAME_FIELD_LEN];
        let name = truncate_name(&self.name);
        name_buf[..name.len()].copy_from_slice(name.as_bytes());
        writer.write_all(&name_buf)?;

        writer.write_u32::<LittleEndian>(self.mode)?;
        writer.write_u32::<LittleEndian>(self.uid)?;
        writer.write_u32::<LittleEndian>(self.gid)?;
        writer.write_i64::<LittleEndian>(self.atime)?;
        writer.write_i64::<LittleEndian>(self.mtime)?;
        writer.write_i32::<LittleEndian>(self.copies.len() as i32)?;

        for copy in &self.copies {
            copy.write(writer)?;
        }
        Ok(())
    }

    /// Payload size shared by every copy of this file
    pub fn payload_size(&self) -> u64 {
        self.copies.first().map_or(0, |c| c.size)
    }

    /// On-disk length of this record including its copy table
    pub fn serialized_len(&self) -> u64 {
        FILE_RECORD_LEN + self.copies.len() as u64 * COPY_RECORD_LEN
    }
}

/// Truncate a name to what fits the NUL-terminated 256-byte field,
/// respecting UTF-8 character boundaries.
pub(crate) fn truncate_name(name: &str) -> &str {
    let max = NAME_FIELD_LEN - 1;
    if name.len() <= max {
        return name;
    }
    let mut end = max;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

/// Read a complete file table of `count` records
pub fn read_file_table<R: Read>(reader: &mut R, count: u32) -> Result<Vec<FileRecord>> {
    let mut records = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        records.push(FileRecord::read(reader)?);
    }
    Ok(records)
}

/// Write a complete file table
pub fn write_file_table<W: Write>(writer: &mut W, records: &[FileRecord]) -> Result<()> {
    for record in records {
        record.write(writer)?;
    }
    Ok(())
}

/// Total on-disk length of a file table
pub fn file_table_len(records: &[FileRecord]) -> u64 {
    records.iter().map(FileRecord::serialized_len).sum()
}
