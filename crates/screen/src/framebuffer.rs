//! Raw RGB565 writes to a Linux framebuffer device.
//!
//! A frame must be exactly `width * height * 2` bytes. Every write holds an
//! exclusive advisory lock on a separate lock file, so other processes that
//! honour the same lock never observe (or produce) a half-written frame.

use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use platform::{DisplayInfo, FrameSink};

/// Framebuffer errors
#[derive(Debug, thiserror::Error)]
pub enum FramebufferError {
    /// Frame length does not match the display
    #[error("frame is {actual} bytes, display expects {expected}")]
    SizeMismatch {
        /// `width * height * 2`
        expected: usize,
        /// Bytes supplied
        actual: usize,
    },

    /// Display geometry cannot be addressed
    #[error("display {width}x{height} is too large")]
    TooLarge {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },

    /// Framebuffer device does not exist
    #[error("framebuffer '{}' does not exist", path.display())]
    Missing {
        /// Device path
        path: PathBuf,
    },

    /// Could not take the lock file
    #[error("failed to lock '{}': {source}", path.display())]
    Lock {
        /// Lock file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Any other I/O error on the device
    #[error("I/O error on framebuffer '{}': {source}", path.display())]
    Io {
        /// Device path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

/// Framebuffer device plus its lock file
#[derive(Debug, Clone)]
pub struct Framebuffer {
    path: PathBuf,
    lock_path: PathBuf,
    info: DisplayInfo,
}

impl Framebuffer {
    /// Describe a framebuffer. Nothing is opened until the first write.
    pub fn new(path: impl Into<PathBuf>, lock_path: impl Into<PathBuf>, info: DisplayInfo) -> Self {
        Self {
            path: path.into(),
            lock_path: lock_path.into(),
            info,
        }
    }

    /// Device path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lock file path
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Bytes in one frame
    pub fn frame_len(&self) -> Result<usize, FramebufferError> {
        self.info.frame_len().ok_or(FramebufferError::TooLarge {
            width: self.info.width,
            height: self.info.height,
        })
    }

    /// Write one frame from offset 0 and flush it.
    ///
    /// The length is checked before the lock file or the device is touched.
    pub fn write(&self, raw: &[u8]) -> Result<(), FramebufferError> {
        let expected = self.frame_len()?;
        if raw.len() != expected {
            return Err(FramebufferError::SizeMismatch {
                expected,
                actual: raw.len(),
            });
        }

        let _lock = FrameLock::acquire(&self.lock_path)?;
        let io_err = |source: io::Error| FramebufferError::Io {
            path: self.path.clone(),
            source,
        };

        let mut device = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => FramebufferError::Missing {
                    path: self.path.clone(),
                },
                _ => io_err(err),
            })?;
        device.seek(SeekFrom::Start(0)).map_err(io_err)?;
        device.write_all(raw).map_err(io_err)?;
        device.flush().map_err(io_err)?;

        tracing::trace!(path = %self.path.display(), bytes = raw.len(), "frame written");
        Ok(())
    }
}

impl FrameSink for Framebuffer {
    type Error = FramebufferError;

    fn info(&self) -> DisplayInfo {
        self.info
    }

    fn write_frame(&mut self, raw: &[u8]) -> Result<(), Self::Error> {
        self.write(raw)
    }
}

/// Exclusive lock held for the duration of one frame write.
struct FrameLock {
    file: File,
}

impl FrameLock {
    fn acquire(path: &Path) -> Result<Self, FramebufferError> {
        let lock_err = |source: io::Error| FramebufferError::Lock {
            path: path.to_path_buf(),
            source,
        };
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)
            .map_err(lock_err)?;
        FileExt::lock_exclusive(&file).map_err(lock_err)?;
        Ok(Self { file })
    }
}

impl Drop for FrameLock {
    fn drop(&mut self) {
        // Closing the file releases the lock anyway.
        let _ = FileExt::unlock(&self.file);
    }
}
