//! End-to-end CLI tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn redarc(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("redarc").unwrap();
    cmd.current_dir(dir);
    cmd
}

fn write_sources(dir: &Path) {
    fs::write(dir.join("a.txt"), b"hello").unwrap();
    let all_bytes: Vec<u8> = (0u8..=255).collect();
    fs::write(dir.join("b.bin"), all_bytes).unwrap();
}

#[test]
fn test_create_list_verify_extract_flow() {
    let tmp = TempDir::new().unwrap();
    write_sources(tmp.path());

    redarc(tmp.path())
        .args(["-c", "a.rda", "-b", "3", "a.txt", "b.bin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 file(s)"));

    redarc(tmp.path())
        .args(["-l", "a.rda"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Files: 2"))
        .stdout(predicate::str::contains("File: a.txt"))
        .stdout(predicate::str::contains("Copies: 3"));

    redarc(tmp.path())
        .args(["-v", "a.rda"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Archive OK"));

    redarc(tmp.path())
        .args(["-x", "a.rda", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored"));

    assert_eq!(fs::read(tmp.path().join("out/a.txt")).unwrap(), b"hello");
    let all_bytes: Vec<u8> = (0u8..=255).collect();
    assert_eq!(fs::read(tmp.path().join("out/b.bin")).unwrap(), all_bytes);
}

#[test]
fn test_verify_reports_corruption_but_exits_zero() {
    let tmp = TempDir::new().unwrap();
    write_sources(tmp.path());

    redarc(tmp.path())
        .args(["-c", "a.rda", "-b", "2", "a.txt"])
        .assert()
        .success();

    // Damage the first copy through the library's view of the layout
    let copy = redarc_archive::Archive::open(tmp.path().join("a.rda")).unwrap().records()[0]
        .copies[0];
    let mut bytes = fs::read(tmp.path().join("a.rda")).unwrap();
    for b in &mut bytes[copy.offset as usize..(copy.offset + copy.size) as usize] {
        *b ^= 0xFF;
    }
    fs::write(tmp.path().join("a.rda"), bytes).unwrap();

    redarc(tmp.path())
        .args(["-v", "a.rda"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Copy 1: CRC ERROR"))
        .stdout(predicate::str::contains("Copy 2: OK"));

    // Extraction recovers from the surviving copy
    redarc(tmp.path())
        .args(["-x", "a.rda", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("from copy 2"));
    assert_eq!(fs::read(tmp.path().join("out/a.txt")).unwrap(), b"hello");
}

#[test]
fn test_extract_overwrite_prompt() {
    let tmp = TempDir::new().unwrap();
    write_sources(tmp.path());

    redarc(tmp.path())
        .args(["-c", "a.rda", "-b", "1", "a.txt"])
        .assert()
        .success();

    fs::create_dir(tmp.path().join("out")).unwrap();
    fs::write(tmp.path().join("out/a.txt"), b"old contents").unwrap();

    // Default answer (bare Enter) keeps the existing file
    redarc(tmp.path())
        .args(["-x", "a.rda", "out"])
        .write_stdin("\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped"));
    assert_eq!(
        fs::read(tmp.path().join("out/a.txt")).unwrap(),
        b"old contents"
    );

    // An explicit yes overwrites
    redarc(tmp.path())
        .args(["-x", "a.rda", "out"])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored"));
    assert_eq!(fs::read(tmp.path().join("out/a.txt")).unwrap(), b"hello");
}

#[test]
fn test_add_and_delete() {
    let tmp = TempDir::new().unwrap();
    write_sources(tmp.path());
    fs::write(tmp.path().join("c.dat"), b"newcomer").unwrap();

    redarc(tmp.path())
        .args(["-c", "a.rda", "-b", "2", "a.txt", "b.bin"])
        .assert()
        .success();
    redarc(tmp.path())
        .args(["-a", "a.rda", "-b", "2", "c.dat"])
        .assert()
        .success();

    // Delete prints the verification of what survives
    redarc(tmp.path())
        .args(["-d", "a.rda", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 'a.txt'"))
        .stdout(predicate::str::contains("Checking file: b.bin"));

    redarc(tmp.path())
        .args(["-l", "a.rda"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Files: 2"))
        .stdout(predicate::str::contains("File: c.dat"))
        .stdout(predicate::str::contains("File: a.txt").not());
}

#[test]
fn test_delete_missing_name_fails() {
    let tmp = TempDir::new().unwrap();
    write_sources(tmp.path());

    redarc(tmp.path())
        .args(["-c", "a.rda", "-b", "1", "a.txt"])
        .assert()
        .success();
    redarc(tmp.path())
        .args(["-d", "a.rda", "nope.txt"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_redundancy_fails() {
    let tmp = TempDir::new().unwrap();
    write_sources(tmp.path());

    redarc(tmp.path())
        .args(["-c", "a.rda", "-b", "0", "a.txt"])
        .assert()
        .failure();
    redarc(tmp.path())
        .args(["-c", "a.rda", "-b", "11", "a.txt"])
        .assert()
        .failure();
    assert!(!tmp.path().join("a.rda").exists());
}

#[test]
fn test_meta_dump_and_load() {
    let tmp = TempDir::new().unwrap();
    write_sources(tmp.path());

    redarc(tmp.path())
        .args(["-c", "a.rda", "-b", "2", "a.txt", "b.bin"])
        .assert()
        .success();
    redarc(tmp.path())
        .args(["--mx", "a.rda", "a.meta"])
        .assert()
        .success();
    redarc(tmp.path())
        .args(["--ma", "a.rda", "a.meta"])
        .assert()
        .success();

    redarc(tmp.path())
        .args(["-v", "a.rda"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Archive OK"));
}

#[test]
fn test_compress_decompress_roundtrip() {
    let tmp = TempDir::new().unwrap();
    let text = b"compressible text ".repeat(200);
    fs::write(tmp.path().join("in.txt"), &text).unwrap();

    redarc(tmp.path())
        .args(["-p", "in.txt", "packed.huf"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Compressed"));
    redarc(tmp.path())
        .args(["-u", "packed.huf", "restored.txt"])
        .assert()
        .success();

    assert_eq!(fs::read(tmp.path().join("restored.txt")).unwrap(), text);
}

#[test]
fn test_decompress_garbage_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("junk"), b"\xde\xad\xbe\xef").unwrap();

    redarc(tmp.path())
        .args(["-u", "junk", "out.bin"])
        .assert()
        .failure();
}

#[test]
fn test_open_garbage_archive_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("junk.rda"), b"not an archive at all").unwrap();

    redarc(tmp.path())
        .args(["-l", "junk.rda"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open"));
}
