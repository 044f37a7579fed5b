//! Archive modification: add and delete through a full rewrite
//!
//! Both operations stream the surviving payload bytes into a temp file in
//! the archive's directory, rebasing every copy offset, then write the
//! combined metadata block, fix the header, and atomically rename over the
//! original. Any failure before the rename leaves the original archive
//! untouched.

use crate::{
    Archive, Error, Result,
    builder::{stage_source, staging_dir},
    header::ArchiveHeader,
    metadata::{self, FileRecord, MAX_REDUNDANCY},
};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Outcome counts for an add operation
#[derive(Debug, Clone, Copy)]
pub struct AddSummary {
    /// New files appended to the archive
    pub added: usize,
    /// New files skipped because they could not be read
    pub skipped: usize,
    /// Logical files in the rewritten archive
    pub total: usize,
}

/// Append `files` to an existing archive with `redundancy` copies each.
///
/// The new records land at the end of the file table in argument order; no
/// deduplication against existing names is attempted.
pub fn add_files<P: AsRef<Path>>(
    archive_path: P,
    files: &[PathBuf],
    redundancy: u32,
) -> Result<AddSummary> {
    if redundancy < 1 || redundancy > MAX_REDUNDANCY {
        return Err(Error::InvalidRedundancy(redundancy));
    }

    let mut archive = Archive::open(&archive_path)?;
    let keep: Vec<FileRecord> = archive.records().to_vec();
    let (total, added, skipped) = rewrite(&mut archive, keep, files, redundancy)?;

    log::info!(
        "added {added} file(s) to {} ({skipped} skipped, {total} total)",
        archive_path.as_ref().display()
    );
    Ok(AddSummary {
        added,
        skipped,
        total,
    })
}

/// Delete the record whose name matches `name` exactly.
///
/// When no record matches, the archive is left untouched and
/// [`Error::FileNotFound`] is returned.
pub fn remove_file<P: AsRef<Path>>(archive_path: P, name: &str) -> Result<()> {
    let mut archive = Archive::open(&archive_path)?;
    if archive.find(name).is_none() {
        return Err(Error::FileNotFound(name.to_string()));
    }

    let keep: Vec<FileRecord> = archive
        .records()
        .iter()
        .filter(|r| r.name != name)
        .cloned()
        .collect();
    rewrite(&mut archive, keep, &[], 1)?;

    log::info!(
        "deleted '{name}' from {}",
        archive_path.as_ref().display()
    );
    Ok(())
}

/// Rewrite `archive` into a sibling temp file: carried-over records first
/// (payloads copied, offsets rebased), then freshly staged `new_files`.
/// Returns (total, added, skipped).
fn rewrite(
    archive: &mut Archive,
    keep: Vec<FileRecord>,
    new_files: &[PathBuf],
    redundancy: u32,
) -> Result<(usize, usize, usize)> {
    let target = archive.path().to_path_buf();
    let mut tmp = NamedTempFile::new_in(staging_dir(&target))?;

    let (total, added, skipped) = {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        ArchiveHeader::placeholder((keep.len() + new_files.len()) as u32).write(&mut writer)?;

        let mut records = Vec::with_capacity(keep.len() + new_files.len());
        for mut record in keep {
            for copy in &mut record.copies {
                let new_offset = writer.stream_position()?;
                archive.copy_payload_into(copy.offset, copy.size, &mut writer)?;
                copy.offset = new_offset;
            }
            records.push(record);
        }

        let mut added = 0usize;
        let mut skipped = 0usize;
        for source in new_files {
            match stage_source(&mut writer, source, redundancy) {
                Ok(record) => {
                    records.push(record);
                    added += 1;
                }
                Err(err) => {
                    log::warn!("skipping {}: {err}", source.display());
                    skipped += 1;
                }
            }
        }

        let meta_offset = writer.stream_position()?;
        metadata::write_file_table(&mut writer, &records)?;

        writer.seek(SeekFrom::Start(0))?;
        ArchiveHeader {
            meta_offset,
            file_count: records.len() as u32,
        }
        .write(&mut writer)?;
        writer.flush()?;
        (records.len(), added, skipped)
    };

    tmp.persist(&target).map_err(|e| Error::Io(e.error))?;
    Ok((total, added, skipped))
}
