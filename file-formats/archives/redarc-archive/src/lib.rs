//! # redarc_archive - Redundant Archive Container
//!
//! A single-file archive container that stores a configurable number of
//! independent copies (1-10) of each packed file, each with its own CRC32,
//! so that localized corruption can be masked by falling back to a
//! surviving copy.
//!
//! ## Layout
//!
//! A version-1 archive is a 21-byte header (magic, version, metadata
//! offset, file count), a payload region holding every copy's bytes, and a
//! metadata block running from `meta_offset` to end of file. Mutations
//! (add, delete) rewrite the whole container through a sibling temp file
//! and atomically rename it into place; a failed mutation leaves the
//! original untouched.
//!
//! ## Examples
//!
//! ```no_run
//! use redarc_archive::{Archive, ArchiveBuilder};
//!
//! # fn main() -> Result<(), redarc_archive::Error> {
//! // Pack two files with three copies each
//! ArchiveBuilder::new()
//!     .redundancy(3)
//!     .add_file("a.txt")
//!     .add_file("b.bin")
//!     .build("backup.rda")?;
//!
//! // Read one back, falling back across copies on CRC mismatch
//! let mut archive = Archive::open("backup.rda")?;
//! let data = archive.read_file("a.txt")?;
//! # let _ = data;
//! # Ok(())
//! # }
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod archive;
pub mod builder;
pub mod crc;
pub mod error;
pub mod header;
pub mod host;
pub mod metadata;
pub mod modification;
pub mod sidecar;

// Re-export commonly used types
pub use archive::{Archive, CopyStatus, ExtractSummary, FileVerify, VerifyReport, output_path};
pub use builder::{ArchiveBuilder, BuildSummary};
pub use error::{Error, Result};
pub use header::{ARCHIVE_MAGIC, ArchiveHeader, FORMAT_VERSION, HEADER_SIZE};
pub use metadata::{CopyRecord, FileRecord, MAX_REDUNDANCY};
pub use modification::{AddSummary, add_files, remove_file};
pub use sidecar::{dump_metadata, load_metadata, read_sidecar};
