//! Writer end of the tap pipe.

use std::path::{Path, PathBuf};

use platform::config::PIPE_BUF_LEN;
use tokio::io::AsyncWriteExt;
use tokio::net::unix::pipe;

use crate::error::PipeError;

/// Delivers complete records to a FIFO, reopening as readers come and go.
///
/// The write end is opened non-blocking, so a FIFO with no reader surfaces
/// as [`PipeError::NoReader`] rather than parking the caller inside `open`.
#[derive(Debug)]
pub struct PipePublisher {
    path: PathBuf,
    sender: Option<pipe::Sender>,
}

impl PipePublisher {
    /// Create a publisher for `path`. Nothing is opened until the first
    /// [`publish`](Self::publish).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sender: None,
        }
    }

    /// FIFO path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `true` while a write handle is held.
    pub fn is_connected(&self) -> bool {
        self.sender.is_some()
    }

    /// Write `record` followed by a newline as one write.
    ///
    /// `record` must not contain a newline and `record.len() + 1` must not
    /// exceed `PIPE_BUF`; both are checked before any I/O. A broken pipe drops
    /// the handle so the next call reopens.
    pub async fn publish(&mut self, record: &[u8]) -> Result<(), PipeError> {
        let line = frame(record)?;

        let mut sender = match self.sender.take() {
            Some(sender) => sender,
            None => self.open()?,
        };

        match sender.write_all(&line).await {
            Ok(()) => {
                self.sender = Some(sender);
                Ok(())
            }
            Err(err) => {
                let err = PipeError::from_write(&self.path, err);
                if err.is_transient() {
                    tracing::info!(path = %self.path.display(), "reader went away");
                }
                Err(err)
            }
        }
    }

    /// Drop the write handle, if any.
    pub fn disconnect(&mut self) {
        if self.sender.take().is_some() {
            tracing::debug!(path = %self.path.display(), "publisher disconnected");
        }
    }

    fn open(&self) -> Result<pipe::Sender, PipeError> {
        let sender = pipe::OpenOptions::new()
            .open_sender(&self.path)
            .map_err(|err| PipeError::from_open(&self.path, err))?;
        tracing::info!(path = %self.path.display(), "publisher connected");
        Ok(sender)
    }
}

/// Append the newline after checking the record fits one atomic write.
fn frame(record: &[u8]) -> Result<Vec<u8>, PipeError> {
    if record.contains(&b'\n') {
        return Err(PipeError::EmbeddedNewline);
    }
    let len = record.len() + 1;
    if len > PIPE_BUF_LEN {
        return Err(PipeError::RecordTooLarge {
            len,
            limit: PIPE_BUF_LEN,
        });
    }
    let mut line = Vec::with_capacity(len);
    line.extend_from_slice(record);
    line.push(b'\n');
    Ok(line)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn frame_appends_newline() {
        assert_eq!(frame(b"{}").unwrap(), b"{}\n");
    }

    #[test]
    fn frame_accepts_exactly_pipe_buf() {
        let record = vec![b'x'; PIPE_BUF_LEN - 1];
        assert_eq!(frame(&record).unwrap().len(), PIPE_BUF_LEN);
    }

    #[test]
    fn frame_rejects_oversized_record() {
        let record = vec![b'x'; PIPE_BUF_LEN];
        assert!(matches!(
            frame(&record),
            Err(PipeError::RecordTooLarge { len, limit }) if len == PIPE_BUF_LEN + 1 && limit == PIPE_BUF_LEN
        ));
    }

    #[test]
    fn frame_rejects_embedded_newline() {
        assert!(matches!(frame(b"a\nb"), Err(PipeError::EmbeddedNewline)));
    }

    #[tokio::test]
    async fn invalid_record_is_rejected_before_open() {
        let mut publisher = PipePublisher::new("/nonexistent/tap_data");
        let err = publisher.publish(b"a\nb").await.unwrap_err();
        assert!(matches!(err, PipeError::EmbeddedNewline));
        assert!(!publisher.is_connected());
    }

    #[tokio::test]
    async fn missing_path_is_fatal() {
        let mut publisher = PipePublisher::new("/nonexistent/tap_data");
        let err = publisher.publish(b"{}").await.unwrap_err();
        assert!(matches!(err, PipeError::Missing { .. }));
        assert!(!err.is_transient());
    }
}
