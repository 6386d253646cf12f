//! Wire codec for tap records.
//!
//! One record is one JSON object on one line:
//!
//! ```text
//! {"status": "GOOD", "data": {"timestamp": "1970-01-01 00:00:00"}}
//! ```
//!
//! Keys are followed by `": "` and members separated by `", "`, the layout
//! every existing consumer of the tap pipe was written against. Timestamps
//! are rendered in UTC with a strftime-style format that both ends read from
//! the shared configuration; the format is validated once, when the codec is
//! built.

use std::fmt::Write as _;
use std::io;

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use platform::{TapStatus, Timestamp};
use touch::TapEvent;

/// Decoded tap record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapRecord {
    /// Tap outcome
    pub status: TapStatus,
    /// Tap time, at the resolution of the timestamp format
    pub timestamp: Timestamp,
}

#[derive(Serialize, Deserialize)]
struct WireRecord {
    status: TapStatus,
    data: WireData,
}

#[derive(Serialize, Deserialize)]
struct WireData {
    timestamp: String,
}

/// Codec errors
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Timestamp format is empty
    #[error("timestamp format is empty")]
    EmptyFormat,
    /// Timestamp format contains an unknown specifier
    #[error("invalid timestamp format '{format}'")]
    InvalidFormat {
        /// The rejected format
        format: String,
    },
    /// Timestamp format renders but cannot be parsed back to a date-time
    #[error("timestamp format '{format}' does not describe a full date and time")]
    IncompleteFormat {
        /// The rejected format
        format: String,
    },
    /// Record is not a well-formed tap record
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),
    /// Timestamp field does not match the configured format
    #[error("timestamp '{value}' does not match format '{format}': {source}")]
    Timestamp {
        /// Timestamp text from the record
        value: String,
        /// Configured format
        format: String,
        /// Parse failure
        #[source]
        source: chrono::ParseError,
    },
    /// Formatting the timestamp failed
    #[error("failed to format timestamp")]
    Format(#[from] std::fmt::Error),
}

/// Encoder/decoder bound to one timestamp format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCodec {
    format: String,
}

impl RecordCodec {
    /// Build a codec, validating `format`.
    pub fn new(format: impl Into<String>) -> Result<Self, CodecError> {
        let format = format.into();
        if format.is_empty() {
            return Err(CodecError::EmptyFormat);
        }
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(CodecError::InvalidFormat { format });
        }
        // The screen side parses what the touch side renders, so the format
        // must carry a full date and time.
        let codec = Self { format };
        let sample = codec.encode(TapStatus::Good, Timestamp::EPOCH)?;
        if codec.decode(&sample).is_err() {
            return Err(CodecError::IncompleteFormat {
                format: codec.format,
            });
        }
        Ok(codec)
    }

    /// The timestamp format
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Render `timestamp` with the codec's format, in UTC.
    pub fn format_timestamp(&self, timestamp: Timestamp) -> Result<String, CodecError> {
        let mut text = String::new();
        write!(text, "{}", timestamp.to_datetime().format(&self.format))?;
        Ok(text)
    }

    /// Encode one record, without the trailing newline.
    ///
    /// Identical inputs always produce identical bytes.
    pub fn encode(&self, status: TapStatus, timestamp: Timestamp) -> Result<Vec<u8>, CodecError> {
        let record = WireRecord {
            status,
            data: WireData {
                timestamp: self.format_timestamp(timestamp)?,
            },
        };
        let mut buf = Vec::with_capacity(64);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
        record.serialize(&mut ser)?;
        Ok(buf)
    }

    /// Encode an accepted tap event.
    pub fn encode_event(&self, event: &TapEvent) -> Result<Vec<u8>, CodecError> {
        self.encode(event.status(), event.timestamp())
    }

    /// Decode one record (with or without its trailing newline).
    pub fn decode(&self, line: &[u8]) -> Result<TapRecord, CodecError> {
        let wire: WireRecord = serde_json::from_slice(line)?;
        let parsed = NaiveDateTime::parse_from_str(&wire.data.timestamp, &self.format).map_err(
            |source| CodecError::Timestamp {
                value: wire.data.timestamp.clone(),
                format: self.format.clone(),
                source,
            },
        )?;
        Ok(TapRecord {
            status: wire.status,
            timestamp: Timestamp::from_datetime(&parsed.and_utc()),
        })
    }
}

/// Compact JSON with a space after `:` and `,`.
struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}
