//! Host filesystem adapter
//!
//! Captures file attributes at archive time and restores them on extract.
//! Ownership and timestamp restoration is best-effort: a failed attempt
//! (e.g. without privilege) is logged and treated as success. Non-unix
//! targets capture defaults and skip owner/timestamp restoration.

use crate::{FileRecord, Result};
use std::fs;
use std::path::Path;

/// File attributes captured for a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    /// Filesystem mode bits
    pub mode: u32,
    /// Owner id
    pub uid: u32,
    /// Group id
    pub gid: u32,
    /// Access time, POSIX seconds
    pub atime: i64,
    /// Modification time, POSIX seconds
    pub mtime: i64,
    /// File size in bytes
    pub size: u64,
}

/// Stat a source file
#[cfg(unix)]
pub fn stat(path: &Path) -> Result<FileStat> {
    use std::os::unix::fs::MetadataExt;

    let meta = fs::metadata(path)?;
    Ok(FileStat {
        mode: meta.mode(),
        uid: meta.uid(),
        gid: meta.gid(),
        atime: meta.atime(),
        mtime: meta.mtime(),
        size: meta.len(),
    })
}

/// Stat a source file
#[cfg(not(unix))]
pub fn stat(path: &Path) -> Result<FileStat> {
    let meta = fs::metadata(path)?;
    Ok(FileStat {
        mode: 0o644,
        uid: 0,
        gid: 0,
        atime: 0,
        mtime: 0,
        size: meta.len(),
    })
}

/// Create the parent directory of `path` if it does not exist yet
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Restore mode, ownership, and timestamps recorded for an extracted file
#[cfg(unix)]
pub fn restore_attributes(path: &Path, record: &FileRecord) -> Result<()> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(record.mode))?;

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| crate::Error::invalid_format("extraction path contains a NUL byte"))?;

    // Ownership is best-effort: unprivileged callers keep their own uid/gid
    let rc = unsafe { libc::chown(c_path.as_ptr(), record.uid, record.gid) };
    if rc != 0 {
        log::debug!(
            "chown({}, {}, {}) failed: {}",
            path.display(),
            record.uid,
            record.gid,
            std::io::Error::last_os_error()
        );
    }

    let times = [
        libc::timeval {
            tv_sec: record.atime as libc::time_t,
            tv_usec: 0,
        },
        libc::timeval {
            tv_sec: record.mtime as libc::time_t,
            tv_usec: 0,
        },
    ];
    let rc = unsafe { libc::utimes(c_path.as_ptr(), times.as_ptr()) };
    if rc != 0 {
        log::debug!(
            "utimes({}, {}, {}) failed: {}",
            path.display(),
            record.atime,
            record.mtime,
            std::io::Error::last_os_error()
        );
    }
    Ok(())
}

/// Restore recorded attributes (no-op outside unix)
#[cfg(not(unix))]
pub fn restore_attributes(_path: &Path, _record: &FileRecord) -> Result<()> {
    Ok(())
}
