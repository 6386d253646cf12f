//! Run a blocking [`UidPoller`] off the async runtime.
//!
//! The poller lives on a blocking-pool thread and forwards each UID over a
//! bounded channel. Cancellation is checked between polls; a poll already in
//! progress runs to completion (the native call cannot be interrupted).

use platform::{Uid, UidPoller};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Reader task errors
#[derive(Debug, thiserror::Error)]
pub enum ReaderError<E>
where
    E: std::error::Error + 'static,
{
    /// The poller failed
    #[error("UID poll failed: {0}")]
    Poll(#[source] E),
    /// The reader thread panicked
    #[error("UID reader task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// UIDs from a running poller.
#[derive(Debug)]
pub struct UidReader<E>
where
    E: std::error::Error + 'static,
{
    rx: mpsc::Receiver<Uid>,
    task: Option<JoinHandle<Result<(), ReaderError<E>>>>,
}

impl<E> UidReader<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// Start polling on the blocking pool, buffering up to `capacity` UIDs.
    pub fn spawn<P>(mut poller: P, capacity: usize, cancel: CancellationToken) -> Self
    where
        P: UidPoller<Error = E> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let task = tokio::task::spawn_blocking(move || {
            while !cancel.is_cancelled() {
                let uid = poller.poll_uid().map_err(ReaderError::Poll)?;
                tracing::debug!(%uid, "card presented");
                if cancel.is_cancelled() || tx.blocking_send(uid).is_err() {
                    break;
                }
            }
            Ok(())
        });
        Self {
            rx,
            task: Some(task),
        }
    }

    /// Wait for the next UID.
    ///
    /// `Ok(None)` once the reader stopped cleanly; `Err` with the poll
    /// failure that stopped it otherwise. Cancel-safe.
    pub async fn next(&mut self) -> Result<Option<Uid>, ReaderError<E>> {
        if let Some(uid) = self.rx.recv().await {
            return Ok(Some(uid));
        }
        let Some(task) = self.task.as_mut() else {
            return Ok(None);
        };
        let outcome = task.await;
        self.task = None;
        outcome??;
        Ok(None)
    }
}
