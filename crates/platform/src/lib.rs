//! Peripheral abstraction layer for the kiosk bridge
//!
//! This crate provides trait-based abstractions for every peripheral the
//! bridge processes touch, enabling development and testing without the
//! kiosk hardware attached.
//!
//! # Architecture Layers
//!
//! ```text
//! Processes (kiosk crate: touch-sensor, screen, nfc-reader)
//!         ↓
//! Feature Layers (touch, pipe, screen, nfc)
//!         ↓
//! Platform (this crate - trait abstractions)
//!         ↓
//! Linux devices (FIFO, framebuffer, libpoll)
//! ```
//!
//! # Abstractions
//!
//! - [`Clock`] - Wall-clock source for debounce and event timestamps
//! - [`TapInput`] - Physical tap line
//! - [`FrameSink`] - RGB565 framebuffer output
//! - [`UidPoller`] - Blocking NFC UID polling
//!
//! # Features
//!
//! - `mocks`: Mock implementations of every trait (for tests in other crates)
//!
//! # Example
//!
//! ```no_run
//! use platform::{Clock, SystemClock, Timestamp};
//!
//! let now = Timestamp::from_secs(SystemClock.now()).unwrap();
//! println!("{}", now.to_datetime());
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer tracing over println! in lib code
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // callers own the runtime; Send bounds are not needed

pub mod clock;
pub mod config;
pub mod display;
pub mod input;
pub mod nfc;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

// Re-export main traits
pub use clock::{Clock, SystemClock, Timestamp, TimestampError};
pub use display::{DisplayInfo, FrameSink};
pub use input::{TapInput, TapStatus, UnknownStatus};
pub use nfc::{decode_uid_buffer, Uid, UidError, UidPoller, UID_BUFFER_LEN};
