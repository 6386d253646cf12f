//! Line-oriented tap input.
//!
//! Each line carries one tap edge as `GOOD` or `BAD` (case-insensitive).
//! Blank lines are ignored. Used with stdin during development and with any
//! character device or FIFO that emits the same format.

use platform::{TapInput, TapStatus, UnknownStatus};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

/// Tap input errors
#[derive(Debug, thiserror::Error)]
pub enum TapInputError {
    /// Reading the source failed
    #[error("failed to read tap input: {0}")]
    Io(#[from] std::io::Error),
    /// Line is not a tap status
    #[error(transparent)]
    Status(#[from] UnknownStatus),
}

/// [`TapInput`] over any async line source
pub struct LineTapInput<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> LineTapInput<R> {
    /// Read taps from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: AsyncBufRead + Unpin> TapInput for LineTapInput<R> {
    type Error = TapInputError;

    async fn wait_for_tap(&mut self) -> Result<Option<TapStatus>, Self::Error> {
        while let Some(line) = self.lines.next_line().await? {
            let line = line.trim();
            if !line.is_empty() {
                return Ok(Some(line.parse()?));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn parses_statuses_and_skips_blank_lines() {
        let mut input = LineTapInput::new(&b"GOOD\n\n bad \r\nGood\n"[..]);
        assert_eq!(input.wait_for_tap().await.unwrap(), Some(TapStatus::Good));
        assert_eq!(input.wait_for_tap().await.unwrap(), Some(TapStatus::Bad));
        assert_eq!(input.wait_for_tap().await.unwrap(), Some(TapStatus::Good));
        assert_eq!(input.wait_for_tap().await.unwrap(), None);
    }

    #[tokio::test]
    async fn unknown_status_is_an_error() {
        let mut input = LineTapInput::new(&b"MAYBE\n"[..]);
        assert!(matches!(
            input.wait_for_tap().await,
            Err(TapInputError::Status(_))
        ));
    }
}
