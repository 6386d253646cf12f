//! Pipe error types

use std::io;
use std::path::{Path, PathBuf};

use crate::codec::CodecError;

/// Errors raised by the pipe publisher, subscriber and delivery task
///
/// Only [`PipeError::NoReader`] is transient; [`PipeError::is_transient`]
/// is the one place that classification is made.
#[derive(Debug, thiserror::Error)]
pub enum PipeError {
    /// The pipe path does not exist (configuration error)
    #[error("pipe '{}' does not exist", path.display())]
    Missing {
        /// Configured pipe path
        path: PathBuf,
    },

    /// The path exists but is not a FIFO (configuration error)
    #[error("'{}' is not a named pipe", path.display())]
    NotAFifo {
        /// Configured pipe path
        path: PathBuf,
    },

    /// No process has the pipe open for reading
    #[error("no reader attached to pipe '{}'", path.display())]
    NoReader {
        /// Configured pipe path
        path: PathBuf,
    },

    /// Record plus newline would not be written atomically
    #[error("record of {len} bytes exceeds the atomic pipe write limit of {limit} bytes")]
    RecordTooLarge {
        /// Record length including the newline
        len: usize,
        /// `PIPE_BUF`
        limit: usize,
    },

    /// Record would span more than one line
    #[error("record contains an embedded newline")]
    EmbeddedNewline,

    /// A line read from the pipe is not a valid record
    #[error("malformed record on pipe '{}': {source}", path.display())]
    Decode {
        /// Configured pipe path
        path: PathBuf,
        /// Codec failure
        #[source]
        source: CodecError,
    },

    /// Any other OS error
    #[error("I/O error on pipe '{}': {source}", path.display())]
    Io {
        /// Configured pipe path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The background pipe task panicked or was aborted
    #[error("pipe task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl PipeError {
    /// `true` for conditions a caller should retry after a short wait.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NoReader { .. })
    }

    /// Classify an error from opening the pipe.
    pub(crate) fn from_open(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => Self::Missing { path },
            // open_sender double-checks the file type.
            io::ErrorKind::InvalidInput => Self::NotAFifo { path },
            _ if err.raw_os_error() == Some(libc::ENXIO) => Self::NoReader { path },
            _ => Self::Io { path, source: err },
        }
    }

    /// Classify an error from writing a record.
    pub(crate) fn from_write(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::BrokenPipe => Self::NoReader { path },
            _ => Self::Io { path, source: err },
        }
    }

    /// Wrap an error from reading the pipe.
    pub(crate) fn from_read(path: &Path, err: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "/run/kiosk-bridge/tap_data";

    #[test]
    fn missing_path_is_fatal() {
        let err = PipeError::from_open(Path::new(PATH), io::ErrorKind::NotFound.into());
        assert!(matches!(err, PipeError::Missing { .. }));
        assert!(!err.is_transient());
        assert!(err.to_string().contains(PATH));
    }

    #[test]
    fn enxio_means_no_reader() {
        let err = PipeError::from_open(
            Path::new(PATH),
            io::Error::from_raw_os_error(libc::ENXIO),
        );
        assert!(matches!(err, PipeError::NoReader { .. }));
        assert!(err.is_transient());
    }

    #[test]
    fn broken_pipe_means_no_reader() {
        let err = PipeError::from_write(Path::new(PATH), io::ErrorKind::BrokenPipe.into());
        assert!(err.is_transient());
    }

    #[test]
    fn permission_denied_is_fatal() {
        let err = PipeError::from_open(Path::new(PATH), io::ErrorKind::PermissionDenied.into());
        assert!(matches!(err, PipeError::Io { .. }));
        assert!(!err.is_transient());
    }

    #[test]
    fn oversized_record_reports_sizes() {
        let err = PipeError::RecordTooLarge {
            len: 5000,
            limit: 4096,
        };
        assert!(err.to_string().contains("5000"));
        assert!(err.to_string().contains("4096"));
    }
}
