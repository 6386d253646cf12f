//! Debounce gate for the tap line.
//!
//! A tap at `now` is a new logical event iff
//! `now - last_accepted >= window`. The boundary is inclusive and the
//! comparison is exact (no epsilon): a tap exactly one window after the last
//! accepted one is accepted. Acceptance moves `last_accepted` to `now`; a
//! rejected tap leaves the state untouched. Before the first acceptance the
//! last tap is "infinitely long ago", so the first tap always passes.
//!
//! [`DebounceGate`] is the single-owner form used by the input loop.
//! [`SharedDebounceGate`] performs the same check-and-update as one atomic
//! compare-and-swap for callers that tap from several threads.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Debounce window is negative, NaN or infinite
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("debounce window must be a finite, non-negative number of seconds (got {0})")]
pub struct InvalidWindow(pub f64);

fn validate_window(window: f64) -> Result<f64, InvalidWindow> {
    if window.is_finite() && window >= 0.0 {
        Ok(window)
    } else {
        Err(InvalidWindow(window))
    }
}

/// State owned by one [`DebounceGate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebounceState {
    last_accepted: Option<f64>,
    window: f64,
}

impl DebounceState {
    /// Time of the last accepted tap, `None` before the first one
    pub fn last_accepted(&self) -> Option<f64> {
        self.last_accepted
    }

    /// Minimum interval between accepted taps, in seconds
    pub fn window(&self) -> f64 {
        self.window
    }

    fn admits(&self, now: f64) -> bool {
        match self.last_accepted {
            None => true,
            Some(last) => now - last >= self.window,
        }
    }
}

/// Single-owner debounce gate.
///
/// # Example
///
/// ```
/// use touch::DebounceGate;
///
/// let mut gate = DebounceGate::new(0.25).unwrap();
/// assert!(gate.tap(10.0));
/// assert!(!gate.tap(10.1));
/// assert!(gate.tap(10.25));
/// ```
#[derive(Debug, Clone)]
pub struct DebounceGate {
    state: DebounceState,
}

impl DebounceGate {
    /// Create a gate with `window` seconds between accepted taps.
    pub fn new(window: f64) -> Result<Self, InvalidWindow> {
        Ok(Self {
            state: DebounceState {
                last_accepted: None,
                window: validate_window(window)?,
            },
        })
    }

    /// Create a gate from a [`Duration`] window (always valid).
    pub fn from_duration(window: Duration) -> Self {
        Self {
            state: DebounceState {
                last_accepted: None,
                window: window.as_secs_f64(),
            },
        }
    }

    /// Decide whether a tap at `now` is a new logical event.
    ///
    /// `now` must not go backwards between calls.
    pub fn tap(&mut self, now: f64) -> bool {
        if self.state.admits(now) {
            self.state.last_accepted = Some(now);
            true
        } else {
            false
        }
    }

    /// Forget the last accepted tap.
    pub fn reset(&mut self) {
        self.state.last_accepted = None;
    }

    /// Current state
    pub fn state(&self) -> &DebounceState {
        &self.state
    }
}

// -inf as bits; f64::to_bits is not const on the MSRV.
const NEVER: u64 = 0xFFF0_0000_0000_0000;

/// Debounce gate safe to tap from several threads.
///
/// The read-compare-write is a compare-and-swap loop over the bit pattern of
/// the last accepted time, so two taps racing at the same instant are never
/// both accepted.
#[derive(Debug)]
pub struct SharedDebounceGate {
    last_bits: AtomicU64,
    window: f64,
}

impl SharedDebounceGate {
    /// Create a gate with `window` seconds between accepted taps.
    pub fn new(window: f64) -> Result<Self, InvalidWindow> {
        Ok(Self {
            last_bits: AtomicU64::new(NEVER),
            window: validate_window(window)?,
        })
    }

    /// Decide whether a tap at `now` is a new logical event.
    pub fn tap(&self, now: f64) -> bool {
        let mut current = self.last_bits.load(Ordering::Acquire);
        loop {
            let admits = current == NEVER || now - f64::from_bits(current) >= self.window;
            if !admits {
                return false;
            }
            match self.last_bits.compare_exchange_weak(
                current,
                now.to_bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Snapshot of the gate's state
    pub fn state(&self) -> DebounceState {
        let bits = self.last_bits.load(Ordering::Acquire);
        DebounceState {
            last_accepted: (bits != NEVER).then(|| f64::from_bits(bits)),
            window: self.window,
        }
    }

    /// Forget the last accepted tap.
    pub fn reset(&self) {
        self.last_bits.store(NEVER, Ordering::Release);
    }
}
