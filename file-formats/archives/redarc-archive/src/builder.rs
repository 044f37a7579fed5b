//! Archive builder for creating redundant archives
//!
//! The archive is staged in a temp file next to the destination and
//! renamed into place once the header is final, so an interrupted create
//! never leaves a truncated archive at the target path.

use crate::{
    Error, Result, crc,
    header::ArchiveHeader,
    host,
    metadata::{self, CopyRecord, FileRecord, MAX_REDUNDANCY},
};
use std::fs;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Outcome counts for an archive build
#[derive(Debug, Clone, Copy)]
pub struct BuildSummary {
    /// Source files stored in the archive
    pub archived: usize,
    /// Source files skipped because they could not be read
    pub skipped: usize,
}

/// Builder for creating new archives
///
/// # Examples
///
/// ```no_run
/// use redarc_archive::ArchiveBuilder;
///
/// let summary = ArchiveBuilder::new()
///     .redundancy(3)
///     .add_file("notes.txt")
///     .add_file("data/blob.bin")
///     .build("backup.rda")?;
/// # Ok::<(), redarc_archive::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    redundancy: u32,
    sources: Vec<PathBuf>,
}

impl ArchiveBuilder {
    /// Create a builder with single-copy redundancy
    pub fn new() -> Self {
        Self {
            redundancy: 1,
            sources: Vec::new(),
        }
    }

    /// Set the number of copies stored per file (validated in [`build`](Self::build))
    pub fn redundancy(mut self, copies: u32) -> Self {
        self.redundancy = copies;
        self
    }

    /// Queue one source file
    pub fn add_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources.push(path.as_ref().to_path_buf());
        self
    }

    /// Queue several source files
    pub fn add_files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.sources
            .extend(paths.into_iter().map(|p| p.as_ref().to_path_buf()));
        self
    }

    /// Write the archive to `path`
    pub fn build<P: AsRef<Path>>(self, path: P) -> Result<BuildSummary> {
        if self.redundancy < 1 || self.redundancy > MAX_REDUNDANCY {
            return Err(Error::InvalidRedundancy(self.redundancy));
        }

        let path = path.as_ref();
        let mut tmp = NamedTempFile::new_in(staging_dir(path))?;

        let (records, skipped) = {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            ArchiveHeader::placeholder(self.sources.len() as u32).write(&mut writer)?;

            let mut records: Vec<FileRecord> = Vec::with_capacity(self.sources.len());
            let mut skipped = 0usize;
            for source in &self.sources {
                match stage_source(&mut writer, source, self.redundancy) {
                    Ok(record) => records.push(record),
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
            (records, skipped)
        };

        tmp.persist(path).map_err(|e| Error::Io(e.error))?;
        log::info!(
            "created {} ({} files, {} copies each, {skipped} skipped)",
            path.display(),
            records.len(),
            self.redundancy
        );
        Ok(BuildSummary {
            archived: records.len(),
            skipped,
        })
    }
}

/// Directory used for staging temp files next to `path`
pub(crate) fn staging_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Stat and buffer one source file, then append `redundancy` identical
/// copies at the current stream position, returning its file record.
pub(crate) fn stage_source<W: Write + Seek>(
    writer: &mut W,
    source: &Path,
    redundancy: u32,
) -> Result<FileRecord> {
    let st = host::stat(source)?;
    let data = fs::read(source)?;
    let checksum = crc::crc32(&data);

    let mut copies = Vec::with_capacity(redundancy as usize);
    for _ in 0..redundancy {
        let offset = writer.stream_position()?;
        writer.write_all(&data)?;
        copies.push(CopyRecord {
            crc: checksum,
            offset,
            size: data.len() as u64,
        });
    }

    Ok(FileRecord {
        name: source.to_string_lossy().into_owned(),
        mode: st.mode,
        uid: st.uid,
        gid: st.gid,
        atime: st.atime,
        mtime: st.mtime,
        copies,
    })
}
