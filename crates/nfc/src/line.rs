//! Development poller: one UID per line from any buffered reader.

use std::io::{self, BufRead};

use platform::{Uid, UidError, UidPoller};

/// Line poller errors
#[derive(Debug, thiserror::Error)]
pub enum LineError {
    /// End of input
    #[error("UID input closed")]
    Closed,
    /// Reading failed
    #[error("failed to read UID line: {0}")]
    Io(#[from] io::Error),
    /// Line is not a valid UID
    #[error(transparent)]
    Uid(#[from] UidError),
}

/// Reads UIDs line by line, skipping blank lines.
#[derive(Debug)]
pub struct LinePoller<R> {
    reader: R,
    line: String,
}

impl<R: BufRead> LinePoller<R> {
    /// Poll UIDs from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
        }
    }
}

impl<R: BufRead> UidPoller for LinePoller<R> {
    type Error = LineError;

    fn poll_uid(&mut self) -> Result<Uid, Self::Error> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Err(LineError::Closed);
            }
            let uid = self.line.trim();
            if !uid.is_empty() {
                return Ok(Uid::new(uid)?);
            }
        }
    }
}
