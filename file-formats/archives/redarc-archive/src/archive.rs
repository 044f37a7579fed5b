//! Archive reading: open, list, verify, and extract
//!
//! An [`Archive`] parses the header and metadata block on open and
//! validates the structural invariants before any payload is touched:
//! magic and version, copy counts, payload spans inside the payload
//! region, equal sizes across copies, and a metadata block ending exactly
//! at end of file.

use crate::{
    Error, Result, crc,
    header::{ArchiveHeader, HEADER_SIZE},
    host,
    metadata::{self, CopyRecord, FileRecord},
};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Component, Path, PathBuf};

/// Verification status of one stored copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStatus {
    /// Recomputed CRC matches the recorded one
    Ok,
    /// Recomputed CRC differs from the recorded one
    Mismatch {
        /// CRC recorded in the copy table
        expected: u32,
        /// CRC recomputed from the payload bytes
        actual: u32,
    },
}

impl CopyStatus {
    /// Whether this copy verified clean
    pub fn is_ok(&self) -> bool {
        matches!(self, CopyStatus::Ok)
    }
}

/// Per-file verification outcome
#[derive(Debug, Clone)]
pub struct FileVerify {
    /// Name of the file in the archive
    pub name: String,
    /// One status per stored copy, in copy-table order
    pub copies: Vec<CopyStatus>,
}

/// Full verification report for an archive
#[derive(Debug, Clone)]
pub struct VerifyReport {
    /// One entry per logical file, in table order
    pub files: Vec<FileVerify>,
}

impl VerifyReport {
    /// Whether every copy of every file verified clean
    pub fn is_clean(&self) -> bool {
        self.files
            .iter()
            .all(|f| f.copies.iter().all(CopyStatus::is_ok))
    }

    /// Total number of copies that failed verification
    pub fn mismatch_count(&self) -> usize {
        self.files
            .iter()
            .flat_map(|f| f.copies.iter())
            .filter(|c| !c.is_ok())
            .count()
    }
}

/// Outcome counts for a bulk extraction
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractSummary {
    /// Files written to the output directory
    pub extracted: usize,
    /// Files that could not be extracted
    pub failed: usize,
}

/// A redundant archive opened for reading
#[derive(Debug)]
pub struct Archive {
    path: PathBuf,
    file: File,
    header: ArchiveHeader,
    records: Vec<FileRecord>,
}

impl Archive {
    /// Open an archive and parse its metadata
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let file_len = file.metadata()?.len();

        let mut reader = BufReader::new(&file);
        let header = ArchiveHeader::read(&mut reader)?;
        if header.meta_offset > file_len {
            return Err(Error::invalid_format(format!(
                "metadata offset {} beyond end of file ({file_len} bytes)",
                header.meta_offset
            )));
        }

        reader.seek(SeekFrom::Start(header.meta_offset))?;
        let records = metadata::read_file_table(&mut reader, header.file_count)?;

        // The metadata block must end exactly at end of file
        let table_end = header.meta_offset + metadata::file_table_len(&records);
        if table_end != file_len {
            return Err(Error::invalid_format(format!(
                "metadata block ends at {table_end}, file ends at {file_len}"
            )));
        }

        for record in &records {
            let size = record.payload_size();
            for copy in &record.copies {
                if copy.offset < HEADER_SIZE || copy.end() > header.meta_offset {
                    return Err(Error::invalid_format(format!(
                        "copy of '{}' at {}..{} escapes the payload region",
                        record.name,
                        copy.offset,
                        copy.end()
                    )));
                }
                if copy.size != size {
                    return Err(Error::invalid_format(format!(
                        "copies of '{}' disagree on size ({} vs {size})",
                        record.name, copy.size
                    )));
                }
            }
        }

        log::debug!(
            "opened {} ({} files, metadata at {})",
            path.display(),
            records.len(),
            header.meta_offset
        );

        Ok(Self {
            path,
            file,
            header,
            records,
        })
    }

    /// Path this archive was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parsed header
    pub fn header(&self) -> ArchiveHeader {
        self.header
    }

    /// File table in on-disk order
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    /// Number of logical files
    pub fn file_count(&self) -> usize {
        self.records.len()
    }

    /// Index of the record whose name matches exactly
    pub fn find(&self, name: &str) -> Option<usize> {
        self.records.iter().position(|r| r.name == name)
    }

    /// Read the payload bytes of one copy, without checking its CRC
    pub fn read_copy(&mut self, copy: CopyRecord) -> Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(copy.offset))?;
        let mut data = vec![0u8; copy.size as usize];
        self.file.read_exact(&mut data)?;
        Ok(data)
    }

    /// Stream one payload span into `writer` in fixed-size chunks
    pub(crate) fn copy_payload_into<W: Write>(
        &mut self,
        offset: u64,
        size: u64,
        writer: &mut W,
    ) -> Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        let mut remaining = size;
        let mut buf = [0u8; crc::CHUNK_SIZE];
        while remaining > 0 {
            let want = remaining.min(buf.len() as u64) as usize;
            self.file.read_exact(&mut buf[..want])?;
            writer.write_all(&buf[..want])?;
            remaining -= want as u64;
        }
        Ok(())
    }

    /// Read a file's contents from the first copy whose CRC verifies
    pub fn read_file(&mut self, name: &str) -> Result<Vec<u8>> {
        let index = self
            .find(name)
            .ok_or_else(|| Error::FileNotFound(name.to_string()))?;
        let copies = self.records[index].copies.clone();
        for (copy_index, copy) in copies.iter().enumerate() {
            let data = self.read_copy(*copy)?;
            if crc::crc32(&data) == copy.crc {
                if copy_index > 0 {
                    log::info!("'{name}' recovered from copy {}", copy_index + 1);
                }
                return Ok(data);
            }
            log::warn!("'{name}' copy {} failed CRC check", copy_index + 1);
        }
        Err(Error::AllCopiesCorrupt {
            name: name.to_string(),
            copies: copies.len(),
        })
    }

    /// Recompute every copy's CRC and report per-copy status.
    ///
    /// Mismatches are findings, not failures; only archive I/O errors
    /// propagate.
    pub fn verify(&mut self) -> Result<VerifyReport> {
        let mut files = Vec::with_capacity(self.records.len());
        for index in 0..self.records.len() {
            let record = self.records[index].clone();
            let mut copies = Vec::with_capacity(record.copies.len());
            for copy in &record.copies {
                let data = self.read_copy(*copy)?;
                let actual = crc::crc32(&data);
                copies.push(if actual == copy.crc {
                    CopyStatus::Ok
                } else {
                    CopyStatus::Mismatch {
                        expected: copy.crc,
                        actual,
                    }
                });
            }
            files.push(FileVerify {
                name: record.name,
                copies,
            });
        }
        Ok(VerifyReport { files })
    }

    /// Extract one record to `dest`, trying copies in order.
    ///
    /// Returns the zero-based index of the copy that was used. Restores
    /// mode, ownership (best-effort), and timestamps after writing.
    pub fn extract_entry(&mut self, index: usize, dest: &Path) -> Result<usize> {
        let record = self.records[index].clone();
        for (copy_index, copy) in record.copies.iter().enumerate() {
            let data = self.read_copy(*copy)?;
            if crc::crc32(&data) != copy.crc {
                log::warn!(
                    "'{}' copy {} failed CRC check, trying next",
                    record.name,
                    copy_index + 1
                );
                continue;
            }

            host::ensure_parent_dir(dest)?;
            std::fs::write(dest, &data)?;
            host::restore_attributes(dest, &record)?;
            return Ok(copy_index);
        }
        Err(Error::AllCopiesCorrupt {
            name: record.name,
            copies: record.copies.len(),
        })
    }

    /// Extract every record (or only the exact `filter` match) into
    /// `out_dir`, overwriting existing files.
    ///
    /// A file that cannot be extracted, whether its copies are all corrupt
    /// or its destination cannot be written, is counted and skipped; it
    /// never aborts extraction of the remaining files.
    pub fn extract_all(&mut self, out_dir: &Path, filter: Option<&str>) -> Result<ExtractSummary> {
        let mut summary = ExtractSummary::default();
        for index in 0..self.records.len() {
            if let Some(name) = filter {
                if self.records[index].name != name {
                    continue;
                }
            }
            let dest = output_path(out_dir, &self.records[index].name);
            match self.extract_entry(index, &dest) {
                Ok(_) => summary.extracted += 1,
                Err(Error::AllCopiesCorrupt { name, copies }) => {
                    log::error!("all {copies} copies of '{name}' are corrupt");
                    summary.failed += 1;
                }
                Err(err) => {
                    log::error!(
                        "failed to extract '{}': {err}",
                        self.records[index].name
                    );
                    summary.failed += 1;
                }
            }
        }
        Ok(summary)
    }
}

/// Join a stored name onto the output directory, dropping root and
/// parent-directory components so extraction cannot escape `out_dir`.
pub fn output_path(out_dir: &Path, name: &str) -> PathBuf {
    let mut dest = out_dir.to_path_buf();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => dest.push(part),
            Component::ParentDir => log::warn!("dropping '..' from stored name '{name}'"),
            Component::RootDir | Component::Prefix(_) | Component::CurDir => {}
        }
    }
    dest
}
