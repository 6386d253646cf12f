//! Test fixtures for the kiosk bridge
//!
//! Named pipes and device stand-ins in throwaway directories, so pipe and
//! framebuffer tests run against real files without touching `/run` or
//! `/dev`.
//!
//! # Quick start
//!
//! ```no_run
//! use kiosk_testing::FixtureDir;
//!
//! let dir = FixtureDir::new().unwrap();
//! let fifo = dir.fifo("tap_data").unwrap();
//! assert!(kiosk_testing::is_fifo(&fifo));
//! ```

// Test tooling: failing loudly is the point.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Create a FIFO at `path` with mode `0o600`.
pub fn make_fifo(path: &Path) -> io::Result<()> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    // SAFETY: `c_path` is a valid NUL-terminated string that outlives the call.
    let rc = unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// `true` if `path` exists and is a FIFO.
pub fn is_fifo(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.file_type().is_fifo())
        .unwrap_or(false)
}

/// Temporary directory holding pipes and fake devices; removed on drop.
pub struct FixtureDir {
    dir: TempDir,
}

impl FixtureDir {
    /// Create an empty fixture directory.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Directory path
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `name` inside the directory, without creating it.
    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Create a FIFO named `name`.
    pub fn fifo(&self, name: &str) -> io::Result<PathBuf> {
        let path = self.join(name);
        make_fifo(&path)?;
        Ok(path)
    }

    /// Create a regular file named `name` with `contents`.
    pub fn file(&self, name: &str, contents: &[u8]) -> io::Result<PathBuf> {
        let path = self.join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_fifo() {
        let dir = FixtureDir::new().unwrap();
        let fifo = dir.fifo("tap_data").unwrap();
        assert!(is_fifo(&fifo));
    }

    #[test]
    fn regular_file_is_not_fifo() {
        let dir = FixtureDir::new().unwrap();
        let file = dir.file("plain", b"").unwrap();
        assert!(!is_fifo(&file));
        assert!(!is_fifo(&dir.join("missing")));
    }

    #[test]
    fn existing_path_is_an_error() {
        let dir = FixtureDir::new().unwrap();
        dir.fifo("tap_data").unwrap();
        let err = make_fifo(&dir.join("tap_data")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }
}
