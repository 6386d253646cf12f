//! Wall-clock source and validated timestamps.
//!
//! Time is carried as `f64` seconds since the Unix epoch, the unit the
//! debounce comparison and the wire timestamp are defined in. [`Timestamp`]
//! is the validated form: constructing one proves the value can be rendered
//! as a UTC date-time, so formatting never fails downstream.

use chrono::{DateTime, Utc};

/// Source of the current wall-clock time.
pub trait Clock {
    /// Seconds since the Unix epoch.
    fn now(&self) -> f64;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        secs_from_datetime(&Utc::now())
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

/// Seconds since the Unix epoch, guaranteed representable as a UTC date-time.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Timestamp(f64);

impl Timestamp {
    /// 1970-01-01T00:00:00Z.
    pub const EPOCH: Self = Self(0.0);

    /// Validate a raw seconds value.
    pub fn from_secs(secs: f64) -> Result<Self, TimestampError> {
        if !secs.is_finite() {
            return Err(TimestampError::NotFinite);
        }
        match datetime_from_secs(secs) {
            Some(_) => Ok(Self(secs)),
            None => Err(TimestampError::OutOfRange { secs }),
        }
    }

    /// Build from a date-time (always representable).
    pub fn from_datetime(datetime: &DateTime<Utc>) -> Self {
        Self(secs_from_datetime(datetime))
    }

    /// Raw seconds since the epoch.
    pub fn as_secs(self) -> f64 {
        self.0
    }

    /// The UTC date-time of this timestamp.
    pub fn to_datetime(self) -> DateTime<Utc> {
        // from_secs already proved the conversion succeeds.
        datetime_from_secs(self.0).unwrap_or(DateTime::UNIX_EPOCH)
    }
}

/// Reasons a seconds value is not a usable timestamp.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum TimestampError {
    /// NaN or infinite.
    #[error("timestamp is not a finite number")]
    NotFinite,
    /// Outside the range chrono can represent.
    #[error("timestamp {secs} is outside the representable date range")]
    OutOfRange {
        /// The rejected value
        secs: f64,
    },
}

#[allow(clippy::cast_precision_loss)] // i64 seconds beyond 2^53 are out of any kiosk's lifetime
fn secs_from_datetime(datetime: &DateTime<Utc>) -> f64 {
    datetime.timestamp() as f64 + f64::from(datetime.timestamp_subsec_nanos()) / 1e9
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn datetime_from_secs(secs: f64) -> Option<DateTime<Utc>> {
    let whole = secs.floor();
    if whole < i64::MIN as f64 || whole >= i64::MAX as f64 {
        return None;
    }
    // frac is in [0, 1); rounding can reach 1e9, clamp to the last nanosecond.
    let nanos = (((secs - whole) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(whole as i64, nanos)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_unix_epoch() {
        assert_eq!(Timestamp::EPOCH.to_datetime(), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn rejects_nan_and_infinity() {
        assert_eq!(Timestamp::from_secs(f64::NAN), Err(TimestampError::NotFinite));
        assert_eq!(
            Timestamp::from_secs(f64::INFINITY),
            Err(TimestampError::NotFinite)
        );
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            Timestamp::from_secs(1e300),
            Err(TimestampError::OutOfRange { .. })
        ));
    }

    #[test]
    fn fractional_seconds_survive_conversion() {
        let ts = Timestamp::from_secs(1_700_000_000.5).unwrap();
        let dt = ts.to_datetime();
        assert_eq!(dt.timestamp(), 1_700_000_000);
        assert_eq!(dt.timestamp_subsec_millis(), 500);
        assert_eq!(Timestamp::from_datetime(&dt).as_secs(), 1_700_000_000.5);
    }

    #[test]
    fn negative_timestamps_floor_correctly() {
        let dt = Timestamp::from_secs(-1.25).unwrap().to_datetime();
        assert_eq!(dt.timestamp(), -2);
        assert_eq!(dt.timestamp_subsec_millis(), 750);
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now() > 1_577_836_800.0);
    }
}
