//! Reader end of the tap pipe.
//!
//! # State machine
//!
//! ```text
//!            open (blocks until a writer attaches)
//!   start ──────────────────────────────────────▶ Open ◀──┐
//!                                                 │  │    │ line → record
//!                                        EOF      │  └────┘
//!                                                 ▼
//!                                             Reopening
//!                                                 │ backoff, then open
//!                                                 └──────────▶ Open
//! ```
//!
//! A missing path or a path that is not a FIFO ends the loop at any open.
//! So does every read or decode error; only end-of-stream is absorbed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use platform::config::DEFAULT_REOPEN_BACKOFF;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::codec::{RecordCodec, TapRecord};
use crate::error::PipeError;
use crate::fifo::ensure_fifo;

/// Subscriber state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberState {
    /// Reading lines from an open FIFO
    Open,
    /// Writer closed; waiting out the backoff before reopening
    Reopening,
}

/// Consumes tap records from a FIFO, reopening whenever the writer closes.
#[derive(Debug, Clone)]
pub struct PipeSubscriber {
    path: PathBuf,
    codec: RecordCodec,
    backoff: Duration,
}

impl PipeSubscriber {
    /// Create a subscriber with the default reopen backoff.
    pub fn new(path: impl Into<PathBuf>, codec: RecordCodec) -> Self {
        Self {
            path: path.into(),
            codec,
            backoff: DEFAULT_REOPEN_BACKOFF,
        }
    }

    /// Override the wait between end-of-stream and reopening.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// FIFO path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reopen backoff
    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Run the read loop, sending every record to `tx` in arrival order.
    ///
    /// Returns `Ok(())` when `cancel` fires or the receiver is dropped, and
    /// the first fatal error otherwise.
    pub async fn run(
        self,
        tx: mpsc::Sender<TapRecord>,
        cancel: CancellationToken,
    ) -> Result<(), PipeError> {
        loop {
            let Some(mut lines) = self.open(&cancel).await? else {
                return Ok(());
            };
            tracing::debug!(path = %self.path.display(), state = ?SubscriberState::Open, "subscriber open");

            loop {
                let line = tokio::select! {
                    () = cancel.cancelled() => return Ok(()),
                    line = lines.next_line() => line.map_err(|err| PipeError::from_read(&self.path, err))?,
                };
                let Some(line) = line else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let record = self
                    .codec
                    .decode(line.as_bytes())
                    .map_err(|source| PipeError::Decode {
                        path: self.path.clone(),
                        source,
                    })?;
                tracing::trace!(status = %record.status, timestamp = record.timestamp.as_secs(), "record received");

                tokio::select! {
                    () = cancel.cancelled() => return Ok(()),
                    sent = tx.send(record) => {
                        if sent.is_err() {
                            tracing::debug!("subscription dropped, stopping subscriber");
                            return Ok(());
                        }
                    }
                }
            }
            // Release the read end before waiting: a writer arriving during
            // the backoff must see no reader, not write into a closing pipe.
            drop(lines);

            tracing::info!(
                path = %self.path.display(),
                state = ?SubscriberState::Reopening,
                backoff_ms = self.backoff.as_millis(),
                "writer closed pipe, reopening",
            );
            tokio::select! {
                () = cancel.cancelled() => return Ok(()),
                () = tokio::time::sleep(self.backoff) => {}
            }
        }
    }

    /// Spawn [`run`](Self::run) on the runtime, buffering up to `capacity`
    /// records.
    pub fn spawn(self, capacity: usize, cancel: CancellationToken) -> Subscription {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let task = tokio::spawn(self.run(tx, cancel));
        Subscription {
            rx,
            task: Some(task),
        }
    }

    /// Check the path, then open it for reading. `None` when cancelled.
    async fn open(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Option<Lines<BufReader<tokio::fs::File>>>, PipeError> {
        ensure_fifo(&self.path).await?;
        let file = tokio::select! {
            () = cancel.cancelled() => return Ok(None),
            file = tokio::fs::File::open(&self.path) => {
                file.map_err(|err| PipeError::from_open(&self.path, err))?
            }
        };
        Ok(Some(BufReader::new(file).lines()))
    }
}

/// Records from a running [`PipeSubscriber`].
///
/// The stream is lazy and cannot be restarted. Once the subscriber task
/// ends, the next call to [`next`](Self::next) reports how it ended.
#[derive(Debug)]
pub struct Subscription {
    rx: mpsc::Receiver<TapRecord>,
    task: Option<JoinHandle<Result<(), PipeError>>>,
}

impl Subscription {
    /// Wait for the next record.
    ///
    /// `Ok(None)` after the subscriber stopped cleanly; `Err` with the fatal
    /// error that stopped it otherwise. Cancel-safe.
    pub async fn next(&mut self) -> Result<Option<TapRecord>, PipeError> {
        if let Some(record) = self.rx.recv().await {
            return Ok(Some(record));
        }
        // The handle is only cleared once joined, so dropping this future
        // mid-join keeps the outcome for the next call.
        let Some(task) = self.task.as_mut() else {
            return Ok(None);
        };
        let outcome = task.await;
        self.task = None;
        outcome??;
        Ok(None)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use platform::config::DEFAULT_TIMESTAMP_FORMAT;

    fn codec() -> RecordCodec {
        RecordCodec::new(DEFAULT_TIMESTAMP_FORMAT).unwrap()
    }

    #[test]
    fn default_backoff_is_one_second() {
        let subscriber = PipeSubscriber::new("/run/kiosk-bridge/tap_data", codec());
        assert_eq!(subscriber.backoff(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn missing_path_is_fatal_immediately() {
        let mut subscription = PipeSubscriber::new("/nonexistent/tap_data", codec())
            .spawn(4, CancellationToken::new());
        let err = subscription.next().await.unwrap_err();
        assert!(matches!(err, PipeError::Missing { .. }));
    }

    #[tokio::test]
    async fn regular_file_is_not_a_fifo() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut subscription =
            PipeSubscriber::new(file.path(), codec()).spawn(4, CancellationToken::new());
        let err = subscription.next().await.unwrap_err();
        assert!(matches!(err, PipeError::NotAFifo { .. }));
    }

    #[tokio::test]
    async fn exhausted_subscription_keeps_returning_none() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut subscription =
            PipeSubscriber::new(file.path(), codec()).spawn(4, CancellationToken::new());
        assert!(subscription.next().await.is_err());
        assert!(subscription.next().await.unwrap().is_none());
    }
}
