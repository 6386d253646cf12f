//! Touch sensor: debounce gate + clock + device identity.

use platform::{Clock, TapStatus, Timestamp, TimestampError};

use crate::debounce::DebounceGate;
use crate::event::TapEvent;

/// Turns raw tap edges into [`TapEvent`]s.
///
/// The clock is read once per edge; the same reading drives the debounce
/// decision and stamps the accepted event.
pub struct TouchSensor<C> {
    device_id: String,
    gate: DebounceGate,
    clock: C,
}

impl<C: Clock> TouchSensor<C> {
    /// Create a sensor for `device_id`.
    pub fn new(device_id: impl Into<String>, gate: DebounceGate, clock: C) -> Self {
        Self {
            device_id: device_id.into(),
            gate,
            clock,
        }
    }

    /// Handle one tap edge.
    ///
    /// Returns `Ok(None)` for a bounce. A clock reading that cannot be a
    /// timestamp is rejected before the gate sees it.
    pub fn tap(&mut self, status: TapStatus) -> Result<Option<TapEvent>, TimestampError> {
        let now = Timestamp::from_secs(self.clock.now())?;
        if !self.gate.tap(now.as_secs()) {
            tracing::trace!(device = %self.device_id, now = now.as_secs(), "tap suppressed");
            return Ok(None);
        }
        tracing::debug!(device = %self.device_id, %status, now = now.as_secs(), "tap accepted");
        Ok(Some(TapEvent::new(self.device_id.clone(), now, status)))
    }

    /// Device identity
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// The sensor's gate
    pub fn gate(&self) -> &DebounceGate {
        &self.gate
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use platform::mocks::ManualClock;

    fn sensor(clock: &ManualClock) -> TouchSensor<&ManualClock> {
        TouchSensor::new("touch-0", DebounceGate::new(0.5).unwrap(), clock)
    }

    #[test]
    fn accepted_tap_is_stamped_with_clock_reading() {
        let clock = ManualClock::new(42.0);
        let mut sensor = sensor(&clock);

        let event = sensor.tap(TapStatus::Good).unwrap().unwrap();
        assert_eq!(event.device_id(), "touch-0");
        assert_eq!(event.timestamp().as_secs(), 42.0);
        assert_eq!(event.status(), TapStatus::Good);
    }

    #[test]
    fn bounce_yields_no_event() {
        let clock = ManualClock::new(1.0);
        let mut sensor = sensor(&clock);

        assert!(sensor.tap(TapStatus::Good).unwrap().is_some());
        clock.advance(0.25);
        assert!(sensor.tap(TapStatus::Bad).unwrap().is_none());
        clock.advance(0.25);
        let event = sensor.tap(TapStatus::Bad).unwrap().unwrap();
        assert_eq!(event.timestamp().as_secs(), 1.5);
    }

    #[test]
    fn invalid_clock_reading_does_not_advance_gate() {
        let clock = ManualClock::new(f64::NAN);
        let mut sensor = sensor(&clock);

        assert_eq!(sensor.tap(TapStatus::Good), Err(TimestampError::NotFinite));
        assert_eq!(sensor.gate().state().last_accepted(), None);
    }
}
