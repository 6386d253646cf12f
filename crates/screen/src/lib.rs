//! Screen side of the kiosk bridge: state, composition and framebuffer output.
//!
//! # Modules
//!
//! - [`state`] - dashboard counters and timed popups
//! - [`theme`] - `#RRGGBB` colours, fonts and messages
//! - [`canvas`] - in-memory RGB565 draw target
//! - [`compose`] - paint a scene onto a draw target
//! - [`framebuffer`] - locked raw writes to the framebuffer device

#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
#![warn(missing_docs)]

pub mod canvas;
pub mod compose;
pub mod framebuffer;
pub mod state;
pub mod theme;

pub use canvas::{color, rgb565, Canvas};
pub use compose::compose;
pub use framebuffer::{Framebuffer, FramebufferError};
pub use state::{is_at_least_next_day, Dashboard, PopupKind, Scene, ScreenState};
pub use theme::{HexColor, InvalidColor, Palette, Theme};
