//! touch-sensor main loop: tap edges → debounced events → delivery queue.

use pipe::{CodecError, DeliveryQueue, RecordCodec};
use platform::{Clock, TapInput, TimestampError};
use tokio_util::sync::CancellationToken;
use touch::TouchSensor;

/// Touch loop errors
#[derive(Debug, thiserror::Error)]
pub enum TouchServiceError {
    /// The tap input failed
    #[error("tap input failed: {0}")]
    Input(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The clock produced an unusable reading
    #[error("clock reading rejected: {0}")]
    Clock(#[from] TimestampError),
    /// An accepted event could not be encoded
    #[error("failed to encode tap event: {0}")]
    Encode(#[from] CodecError),
}

/// Tap counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchStats {
    /// Edges accepted by the debounce gate and queued
    pub accepted: u64,
    /// Edges rejected as bounces
    pub suppressed: u64,
    /// Accepted events dropped because the queue was full or closed
    pub dropped: u64,
}

/// Read taps until the input ends or `cancel` fires.
///
/// The loop never waits on the pipe: accepted events are handed to `queue`
/// without blocking and dropped (with a warning) if it is full.
pub async fn run<I, C>(
    mut input: I,
    mut sensor: TouchSensor<C>,
    codec: &RecordCodec,
    queue: &DeliveryQueue,
    cancel: &CancellationToken,
) -> Result<TouchStats, TouchServiceError>
where
    I: TapInput,
    C: Clock,
{
    let mut stats = TouchStats::default();
    loop {
        let status = tokio::select! {
            () = cancel.cancelled() => break,
            status = input.wait_for_tap() => status.map_err(|e| TouchServiceError::Input(Box::new(e)))?,
        };
        let Some(status) = status else {
            tracing::info!("tap input closed");
            break;
        };

        match sensor.tap(status)? {
            Some(event) => {
                let record = codec.encode_event(&event)?;
                if queue.try_send(record) {
                    stats.accepted += 1;
                } else {
                    stats.dropped += 1;
                }
            }
            None => stats.suppressed += 1,
        }
    }
    Ok(stats)
}
