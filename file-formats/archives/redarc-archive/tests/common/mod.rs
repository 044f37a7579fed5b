//! Shared fixtures for the integration suites
#![allow(dead_code)]

use redarc_archive::ArchiveBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A built archive plus the sources it was packed from
pub struct Fixture {
    /// Keeps the scratch directory alive for the test's duration
    pub dir: TempDir,
    /// Path of the built archive
    pub archive: PathBuf,
    /// Stored name and original contents of every packed file
    pub sources: Vec<(String, Vec<u8>)>,
}

/// Write the given sources into a scratch directory and pack them
pub fn build_fixture(specs: &[(&str, &[u8])], redundancy: u32) -> Fixture {
    let dir = TempDir::new().unwrap();
    let mut builder = ArchiveBuilder::new().redundancy(redundancy);
    let mut sources = Vec::new();
    for (name, contents) in specs {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        builder = builder.add_file(&path);
        sources.push((path.to_string_lossy().into_owned(), contents.to_vec()));
    }
    let archive = dir.path().join("fixture.rda");
    builder.build(&archive).unwrap();
    Fixture {
        dir,
        archive,
        sources,
    }
}

/// Flip `len` payload bytes at `offset` so their CRC can no longer match
pub fn corrupt_range(archive: &Path, offset: u64, len: usize) {
    let mut bytes = fs::read(archive).unwrap();
    for b in &mut bytes[offset as usize..offset as usize + len] {
        *b ^= 0xFF;
    }
    fs::write(archive, bytes).unwrap();
}

/// Create an extra source file inside the fixture directory
pub fn add_source(fixture: &Fixture, name: &str, contents: &[u8]) -> PathBuf {
    let path = fixture.dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}
