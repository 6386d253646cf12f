//! Tap record delivery over a named pipe.
//!
//! The touch-sensor process owns the write end ([`PipePublisher`], usually
//! behind a [`delivery`] queue); the screen process owns the read end
//! ([`PipeSubscriber`]). Records are single JSON lines encoded by
//! [`RecordCodec`].
//!
//! Either side may start first and either side may restart at any time:
//!
//! - publishing with no reader attached is [`PipeError::NoReader`], which
//!   [`PipeError::is_transient`] classifies as retryable;
//! - the subscriber treats end-of-stream as "writer went away" and reopens
//!   after a backoff.
//!
//! A missing FIFO or a path that is not a FIFO is a configuration error on
//! both ends.

#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]
#![warn(missing_docs)]

pub mod codec;
pub mod delivery;
pub mod error;
mod fifo;
pub mod publisher;
pub mod subscriber;

pub use codec::{CodecError, RecordCodec, TapRecord};
pub use delivery::{channel, DeliveryQueue, DeliveryTask, CHANNEL_DEPTH};
pub use error::PipeError;
pub use publisher::PipePublisher;
pub use subscriber::{PipeSubscriber, SubscriberState, Subscription};
