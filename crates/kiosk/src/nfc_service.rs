//! nfc-reader main loop: UIDs → log (and optionally a FIFO).

use nfc::{ReaderError, UidReader};
use pipe::{PipeError, PipePublisher};
use tokio_util::sync::CancellationToken;

/// NFC loop errors
#[derive(Debug, thiserror::Error)]
pub enum NfcServiceError<E>
where
    E: std::error::Error + 'static,
{
    /// The reader stopped with an error
    #[error(transparent)]
    Reader(#[from] ReaderError<E>),
    /// Forwarding failed for a reason other than a missing reader
    #[error("failed to forward UID: {0}")]
    Forward(#[from] PipeError),
}

/// Log every UID until the reader ends or `cancel` fires; returns the
/// number of UIDs seen.
///
/// With `forward` set, each UID is also written to that FIFO as one line.
/// A FIFO nobody is reading is not an error: the UID is only logged.
pub async fn run<E>(
    mut reader: UidReader<E>,
    mut forward: Option<PipePublisher>,
    cancel: &CancellationToken,
) -> Result<u64, NfcServiceError<E>>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let mut seen = 0u64;
    loop {
        let uid = tokio::select! {
            () = cancel.cancelled() => break,
            uid = reader.next() => uid?,
        };
        let Some(uid) = uid else {
            break;
        };
        seen += 1;
        tracing::info!(%uid, "card UID");

        if let Some(publisher) = forward.as_mut() {
            match publisher.publish(uid.as_str().as_bytes()).await {
                Ok(()) => {}
                Err(err) if err.is_transient() => {
                    tracing::debug!(error = %err, "UID not forwarded");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
    Ok(seen)
}
