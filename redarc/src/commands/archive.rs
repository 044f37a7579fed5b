//! Archive command implementations

use anyhow::{Context, Result, bail};
use redarc_archive::{Archive, ArchiveBuilder, CopyStatus, Error, output_path};
use std::path::{Path, PathBuf};

use crate::utils::confirm_overwrite;

pub fn create(archive: &Path, redundancy: u32, files: &[PathBuf]) -> Result<()> {
    let summary = ArchiveBuilder::new()
        .redundancy(redundancy)
        .add_files(files)
        .build(archive)
        .with_context(|| format!("failed to create {}", archive.display()))?;

    println!(
        "Created {} with {} file(s), {} copies each",
        archive.display(),
        summary.archived,
        redundancy
    );
    if summary.skipped > 0 {
        println!("Skipped {} unreadable file(s)", summary.skipped);
    }
    Ok(())
}

pub fn add(archive: &Path, redundancy: u32, files: &[PathBuf]) -> Result<()> {
    let summary = redarc_archive::add_files(archive, files, redundancy)
        .with_context(|| format!("failed to add files to {}", archive.display()))?;

    println!(
        "Added {} file(s) to {} ({} total)",
        summary.added,
        archive.display(),
        summary.total
    );
    if summary.skipped > 0 {
        println!("Skipped {} unreadable file(s)", summary.skipped);
    }
    Ok(())
}

pub fn delete(archive: &Path, name: &str) -> Result<()> {
    redarc_archive::remove_file(archive, name)
        .with_context(|| format!("failed to delete '{name}' from {}", archive.display()))?;
    println!("Deleted '{name}' from {}", archive.display());

    // Show the state of the surviving copies, like the original tool
    verify(archive)
}

pub fn list(archive: &Path) -> Result<()> {
    let parsed =
        Archive::open(archive).with_context(|| format!("failed to open {}", archive.display()))?;

    println!("Archive: {}", archive.display());
    println!("Files: {}", parsed.file_count());
    println!("========================================");
    for record in parsed.records() {
        println!("File: {}", record.name);
        println!("Mode: {:o}", record.mode);
        println!("Owner: {}", record.uid);
        println!("Group: {}", record.gid);
        println!("Copies: {}", record.copies.len());
        for (index, copy) in record.copies.iter().enumerate() {
            println!("  Copy {}:", index + 1);
            println!("    CRC32: {:08x}", copy.crc);
            println!("    Size: {} bytes", copy.size);
            println!("    Offset: {}", copy.offset);
        }
        println!("----------------------------------------");
    }
    Ok(())
}

pub fn verify(archive: &Path) -> Result<()> {
    let mut parsed =
        Archive::open(archive).with_context(|| format!("failed to open {}", archive.display()))?;
    let report = parsed
        .verify()
        .with_context(|| format!("failed to read {}", archive.display()))?;

    for file in &report.files {
        println!("Checking file: {}", file.name);
        for (index, status) in file.copies.iter().enumerate() {
            match status {
                CopyStatus::Ok => println!("  Copy {}: OK", index + 1),
                CopyStatus::Mismatch { expected, actual } => println!(
                    "  Copy {}: CRC ERROR (expected {expected:08x}, got {actual:08x})",
                    index + 1
                ),
            }
        }
    }

    // Mismatches are findings, not failures
    if report.is_clean() {
        println!("Archive OK");
    } else {
        println!("{} corrupt copies found", report.mismatch_count());
    }
    Ok(())
}

pub fn extract(archive: &Path, dir: &Path, file: Option<&str>) -> Result<()> {
    let mut parsed =
        Archive::open(archive).with_context(|| format!("failed to open {}", archive.display()))?;

    if let Some(name) = file {
        if parsed.find(name).is_none() {
            bail!("file not found in archive: {name}");
        }
    }

    let mut failed = 0usize;
    for index in 0..parsed.file_count() {
        let name = parsed.records()[index].name.clone();
        if let Some(wanted) = file {
            if name != wanted {
                continue;
            }
        }

        let dest = output_path(dir, &name);
        if dest.exists() && !confirm_overwrite(&dest)? {
            println!("Skipped {}", dest.display());
            continue;
        }

        match parsed.extract_entry(index, &dest) {
            Ok(copy) => println!("Restored {} from copy {}", dest.display(), copy + 1),
            Err(Error::AllCopiesCorrupt { name, copies }) => {
                println!("ERROR: all {copies} copies of '{name}' are corrupt");
                failed += 1;
            }
            Err(err) => {
                println!("ERROR: failed to extract '{name}': {err}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        println!("{failed} file(s) could not be recovered");
    }
    Ok(())
}

pub fn meta_dump(archive: &Path, output: &Path) -> Result<()> {
    if output.exists() && !confirm_overwrite(output)? {
        println!("Skipped {}", output.display());
        return Ok(());
    }

    redarc_archive::dump_metadata(archive, output)
        .with_context(|| format!("failed to dump metadata of {}", archive.display()))?;
    println!("Wrote metadata sidecar {}", output.display());
    Ok(())
}

pub fn meta_load(archive: &Path, input: &Path) -> Result<()> {
    redarc_archive::load_metadata(archive, input)
        .with_context(|| format!("failed to load metadata into {}", archive.display()))?;
    println!(
        "Loaded metadata from {} into {}",
        input.display(),
        archive.display()
    );
    Ok(())
}
