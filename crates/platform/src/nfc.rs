//! NFC UID polling abstraction
//!
//! The reader module is driven by a native blocking call that fills a
//! caller-provided byte buffer with a NUL-terminated UTF-8 UID. The
//! [`UidPoller`] trait is the only capability the rest of the bridge sees, so
//! callers never depend on how the native library is bound.

/// Buffer capacity handed to the native poll function.
pub const UID_BUFFER_LEN: usize = 64;

/// Blocking UID source.
pub trait UidPoller {
    /// Error type for poll failures
    type Error: std::error::Error + Send + Sync + 'static;

    /// Block until a card is presented and return its UID.
    fn poll_uid(&mut self) -> Result<Uid, Self::Error>;
}

/// A card UID as reported by the reader (never empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Uid(String);

impl Uid {
    /// Wrap a UID string, rejecting empty input.
    pub fn new(uid: impl Into<String>) -> Result<Self, UidError> {
        let uid = uid.into();
        if uid.is_empty() {
            return Err(UidError::Empty);
        }
        Ok(Self(uid))
    }

    /// The UID text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Uid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Malformed UID buffer contents
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UidError {
    /// No NUL terminator within the buffer
    #[error("UID buffer of {capacity} bytes is not NUL-terminated")]
    Unterminated {
        /// Buffer capacity
        capacity: usize,
    },
    /// Bytes before the terminator are not UTF-8
    #[error("UID is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] core::str::Utf8Error),
    /// Zero-length UID
    #[error("reader returned an empty UID")]
    Empty,
}

/// Decode a native poll buffer: bytes up to the first NUL, as UTF-8.
pub fn decode_uid_buffer(buf: &[u8]) -> Result<Uid, UidError> {
    let text = core::ffi::CStr::from_bytes_until_nul(buf)
        .map_err(|_| UidError::Unterminated {
            capacity: buf.len(),
        })?
        .to_str()?;
    Uid::new(text)
}
