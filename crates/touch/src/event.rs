//! Logical tap events.

use platform::{TapStatus, Timestamp};

/// A debounced, timestamped, status-tagged tap.
///
/// Fields are private: an event is immutable once the sensor has built it.
#[derive(Debug, Clone, PartialEq)]
pub struct TapEvent {
    device_id: String,
    timestamp: Timestamp,
    status: TapStatus,
}

impl TapEvent {
    /// Build an event.
    pub fn new(device_id: impl Into<String>, timestamp: Timestamp, status: TapStatus) -> Self {
        Self {
            device_id: device_id.into(),
            timestamp,
            status,
        }
    }

    /// Device the tap came from
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Acceptance time
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Tap outcome
    pub fn status(&self) -> TapStatus {
        self.status
    }
}
