//! The three kiosk bridge processes
//!
//! ```text
//! tap line ─→ kiosk-touch-sensor ─→ [tap_data FIFO] ─→ kiosk-screen ─→ /dev/fb1
//! card     ─→ kiosk-nfc-reader   ─→ log (optional forward FIFO)
//! ```
//!
//! Each binary is a thin wrapper: parse flags, load [`config::KioskConfig`],
//! install logging, then hand off to one of the service loops here. The
//! loops are plain async functions over the platform traits, so the
//! integration tests drive them with mocks and temporary FIFOs.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![allow(async_fn_in_trait)]

pub mod cli;
pub mod config;
pub mod input;
pub mod logging;
pub mod nfc_service;
pub mod screen_service;
pub mod shutdown;
pub mod touch_service;

pub use cli::Args;
pub use config::{ConfigError, KioskConfig, LogLevel, NfcSource};
pub use input::{LineTapInput, TapInputError};
pub use logging::init_logging;
pub use nfc_service::NfcServiceError;
pub use screen_service::{ScreenService, ScreenServiceError};
pub use touch_service::{TouchServiceError, TouchStats};
