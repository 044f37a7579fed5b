//! Metadata sidecar dump and load
//!
//! A sidecar is `file_count` (i32 LE) followed by a verbatim metadata
//! block, for external auditing and repair tooling.
//!
//! Loading is a **trusted operation**: the sidecar's copy offsets and
//! sizes must describe the archive's payload region exactly. The loader
//! rewrites the metadata block at the archive's existing `meta_offset`
//! (truncating the file to the new block's end) and updates the header
//! count, but does not re-validate payload invariants.

use crate::{
    Archive, Error, Result,
    header::ArchiveHeader,
    metadata::{self, FileRecord},
};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

/// Write an archive's metadata sidecar to `out_path`
pub fn dump_metadata<P: AsRef<Path>, Q: AsRef<Path>>(archive_path: P, out_path: Q) -> Result<()> {
    let archive = Archive::open(&archive_path)?;

    let mut out = BufWriter::new(File::create(out_path.as_ref())?);
    out.write_i32::<LittleEndian>(archive.file_count() as i32)?;
    metadata::write_file_table(&mut out, archive.records())?;
    out.flush()?;

    log::info!(
        "dumped metadata for {} files to {}",
        archive.file_count(),
        out_path.as_ref().display()
    );
    Ok(())
}

/// Read a sidecar file into its file table
pub fn read_sidecar<P: AsRef<Path>>(path: P) -> Result<Vec<FileRecord>> {
    let mut reader = BufReader::new(File::open(path.as_ref())?);
    let count = reader.read_i32::<LittleEndian>()?;
    if count < 0 {
        return Err(Error::invalid_format(format!(
            "negative file count {count} in sidecar"
        )));
    }
    metadata::read_file_table(&mut reader, count as u32)
}

/// Replace an archive's metadata block with the contents of a sidecar
pub fn load_metadata<P: AsRef<Path>, Q: AsRef<Path>>(archive_path: P, sidecar_path: Q) -> Result<()> {
    let records = read_sidecar(&sidecar_path)?;

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(archive_path.as_ref())?;
    let header = ArchiveHeader::read(&mut file)?;

    file.seek(SeekFrom::Start(header.meta_offset))?;
    metadata::write_file_table(&mut file, &records)?;
    file.set_len(header.meta_offset + metadata::file_table_len(&records))?;

    file.seek(SeekFrom::Start(0))?;
    ArchiveHeader {
        meta_offset: header.meta_offset,
        file_count: records.len() as u32,
    }
    .write(&mut file)?;

    log::info!(
        "loaded metadata for {} files into {}",
        records.len(),
        archive_path.as_ref().display()
    );
    Ok(())
}
