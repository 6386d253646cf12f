//! NFC card UID polling.
//!
//! - [`LinePoller`] - UIDs from a buffered reader (stdin during development)
//! - `NativePoller` - the vendor's blocking `libpoll` (feature `libpoll`)
//! - [`UidReader`] - runs any [`platform::UidPoller`] on the blocking pool

#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
#![warn(missing_docs)]

pub mod line;
#[cfg(feature = "libpoll")]
pub mod native;
pub mod reader;

pub use line::{LineError, LinePoller};
#[cfg(feature = "libpoll")]
pub use native::NativePoller;
pub use reader::{ReaderError, UidReader};
