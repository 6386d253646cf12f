//! Tap debouncing for the kiosk touch line.
//!
//! # Modules
//!
//! - [`debounce`] - `DebounceGate` / `SharedDebounceGate`
//! - [`event`] - immutable `TapEvent`
//! - [`sensor`] - `TouchSensor`, gate + clock + device id

#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
#![warn(missing_docs)]

pub mod debounce;
pub mod event;
pub mod sensor;

// Top-level re-exports for convenience
pub use debounce::{DebounceGate, DebounceState, InvalidWindow, SharedDebounceGate};
pub use event::TapEvent;
pub use platform::TapStatus;
pub use sensor::TouchSensor;
