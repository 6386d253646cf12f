//! Bounded queue between the tap input loop and the pipe publisher.
//!
//! # Overflow handling
//!
//! [`DeliveryQueue::try_send`] never waits. If the publisher stalls (no
//! reader for a long time) and the queue reaches capacity, the newest record
//! is dropped with a warning instead of blocking the input loop. Records that
//! made it into the queue are delivered in order, each exactly once.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::PipeError;
use crate::publisher::PipePublisher;

/// Default queue depth.
pub const CHANNEL_DEPTH: usize = 16;

/// Producer half: enqueue encoded records without blocking.
#[derive(Debug, Clone)]
pub struct DeliveryQueue {
    tx: mpsc::Sender<Vec<u8>>,
}

/// Consumer half: owns the publisher and drains the queue.
#[derive(Debug)]
pub struct DeliveryTask {
    publisher: PipePublisher,
    rx: mpsc::Receiver<Vec<u8>>,
    retry: Duration,
}

/// Build a queue of `capacity` records in front of `publisher`.
pub fn channel(
    publisher: PipePublisher,
    capacity: usize,
    retry: Duration,
) -> (DeliveryQueue, DeliveryTask) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        DeliveryQueue { tx },
        DeliveryTask {
            publisher,
            rx,
            retry,
        },
    )
}

impl DeliveryQueue {
    /// Enqueue `record`. Returns `false` if it was dropped.
    pub fn try_send(&self, record: Vec<u8>) -> bool {
        match self.tx.try_send(record) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!("delivery queue full, dropping tap record");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::warn!("delivery task stopped, dropping tap record");
                false
            }
        }
    }
}

impl DeliveryTask {
    /// The publisher's FIFO path
    pub fn path(&self) -> &std::path::Path {
        self.publisher.path()
    }

    /// Publish queued records until every [`DeliveryQueue`] is dropped or
    /// `cancel` fires.
    ///
    /// A transient error keeps the current record at the head of the queue
    /// and retries it after `retry`; any other error ends the task.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<(), PipeError> {
        loop {
            let record = tokio::select! {
                () = cancel.cancelled() => return Ok(()),
                record = self.rx.recv() => match record {
                    Some(record) => record,
                    None => return Ok(()),
                },
            };
            if !self.deliver(&record, &cancel).await? {
                return Ok(());
            }
        }
    }

    /// Publish one record, retrying while no reader is attached.
    /// `Ok(false)` when cancelled first, including mid-write.
    async fn deliver(
        &mut self,
        record: &[u8],
        cancel: &CancellationToken,
    ) -> Result<bool, PipeError> {
        let mut attempts = 0u32;
        loop {
            // A reader that stops reading leaves the write pending once the
            // pipe is full. Records fit in PIPE_BUF, so an abandoned write
            // never leaves half a line behind.
            let published = tokio::select! {
                () = cancel.cancelled() => return Ok(false),
                published = self.publisher.publish(record) => published,
            };
            match published {
                Ok(()) => {
                    if attempts > 0 {
                        tracing::info!(path = %self.publisher.path().display(), attempts, "record delivered after retry");
                    }
                    return Ok(true);
                }
                Err(err) if err.is_transient() => {
                    attempts += 1;
                    if attempts == 1 {
                        tracing::warn!(error = %err, retry_ms = self.retry.as_millis(), "publish failed, retrying");
                    } else {
                        tracing::debug!(error = %err, attempts, "publish retry");
                    }
                }
                Err(err) => return Err(err),
            }
            tokio::select! {
                () = cancel.cancelled() => return Ok(false),
                () = tokio::time::sleep(self.retry) => {}
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn full_queue_drops_newest() {
        let (queue, _task) = channel(PipePublisher::new("/nonexistent"), 2, Duration::ZERO);
        assert!(queue.try_send(b"1".to_vec()));
        assert!(queue.try_send(b"2".to_vec()));
        assert!(!queue.try_send(b"3".to_vec()));
    }

    #[tokio::test]
    async fn closed_queue_drops() {
        let (queue, task) = channel(PipePublisher::new("/nonexistent"), 2, Duration::ZERO);
        drop(task);
        assert!(!queue.try_send(b"1".to_vec()));
    }

    #[tokio::test]
    async fn fatal_error_ends_task() {
        let (queue, task) = channel(PipePublisher::new("/nonexistent/tap_data"), 2, Duration::ZERO);
        assert!(queue.try_send(b"{}".to_vec()));
        let err = task.run(CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, PipeError::Missing { .. }));
    }

    #[tokio::test]
    async fn dropping_every_queue_ends_task() {
        let (queue, task) = channel(PipePublisher::new("/nonexistent"), 2, Duration::ZERO);
        drop(queue);
        task.run(CancellationToken::new()).await.unwrap();
    }
}
