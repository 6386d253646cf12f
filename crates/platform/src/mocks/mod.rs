//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::*;

/// Manually driven clock
///
/// Shared by reference between the code under test and the test body, which
/// moves time forward explicitly.
#[derive(Debug)]
pub struct ManualClock {
    bits: AtomicU64,
}

impl ManualClock {
    /// Create a clock reading `secs`
    pub fn new(secs: f64) -> Self {
        Self {
            bits: AtomicU64::new(secs.to_bits()),
        }
    }

    /// Jump to `secs`
    pub fn set(&self, secs: f64) {
        self.bits.store(secs.to_bits(), Ordering::SeqCst);
    }

    /// Move forward by `delta` seconds
    pub fn advance(&self, delta: f64) {
        let next = self.now() + delta;
        self.set(next);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}

/// Mock tap input replaying a fixed script of edges
pub struct MockTapInput {
    taps: VecDeque<TapStatus>,
}

impl MockTapInput {
    /// Create new mock input
    pub fn new() -> Self {
        Self {
            taps: VecDeque::new(),
        }
    }

    /// Queue a tap edge
    pub fn add_tap(&mut self, status: TapStatus) {
        self.taps.push_back(status);
    }

    /// Edges not yet consumed
    pub fn remaining(&self) -> usize {
        self.taps.len()
    }
}

impl Default for MockTapInput {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<TapStatus> for MockTapInput {
    fn from_iter<I: IntoIterator<Item = TapStatus>>(iter: I) -> Self {
        Self {
            taps: iter.into_iter().collect(),
        }
    }
}

impl TapInput for MockTapInput {
    type Error = core::convert::Infallible;

    async fn wait_for_tap(&mut self) -> Result<Option<TapStatus>, Self::Error> {
        Ok(self.taps.pop_front())
    }
}

/// Failure injected into [`MockUidPoller`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("mock poll failure: {0}")]
pub struct MockPollError(pub String);

/// Mock UID poller returning scripted results, then `Exhausted`
pub struct MockUidPoller {
    results: VecDeque<Result<Uid, MockPollError>>,
}

impl MockUidPoller {
    /// Create a poller that yields `uids` in order
    pub fn with_uids<'a>(uids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            results: uids
                .into_iter()
                .filter_map(|uid| Uid::new(uid).ok())
                .map(Ok)
                .collect(),
        }
    }

    /// Queue a failure after the scripted UIDs
    pub fn push_error(&mut self, message: &str) {
        self.results
            .push_back(Err(MockPollError(message.to_owned())));
    }
}

impl UidPoller for MockUidPoller {
    type Error = MockPollError;

    fn poll_uid(&mut self) -> Result<Uid, Self::Error> {
        self.results
            .pop_front()
            .unwrap_or_else(|| Err(MockPollError("exhausted".to_owned())))
    }
}

/// Mock frame sink recording every frame written
pub struct MockFrameSink {
    info: DisplayInfo,
    frames: Vec<Vec<u8>>,
}

/// Frame length did not match the mock display geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("mock frame is {actual} bytes, expected {expected}")]
pub struct MockSizeMismatch {
    /// Expected byte count
    pub expected: usize,
    /// Actual byte count
    pub actual: usize,
}

impl MockFrameSink {
    /// Create new mock sink
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            info: DisplayInfo::new(width, height),
            frames: Vec::new(),
        }
    }

    /// Frames written so far
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }
}

impl FrameSink for MockFrameSink {
    type Error = MockSizeMismatch;

    fn info(&self) -> DisplayInfo {
        self.info
    }

    fn write_frame(&mut self, raw: &[u8]) -> Result<(), Self::Error> {
        let expected = self.info.frame_len().unwrap_or(0);
        if raw.len() != expected {
            return Err(MockSizeMismatch {
                expected,
                actual: raw.len(),
            });
        }
        self.frames.push(raw.to_vec());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(10.0);
        clock.advance(0.5);
        assert_eq!(clock.now(), 10.5);
        clock.set(0.0);
        assert_eq!(clock.now(), 0.0);
    }

    #[tokio::test]
    async fn test_mock_input() {
        let mut input: MockTapInput = [TapStatus::Good, TapStatus::Bad].into_iter().collect();

        assert_eq!(input.wait_for_tap().await.unwrap(), Some(TapStatus::Good));
        assert_eq!(input.wait_for_tap().await.unwrap(), Some(TapStatus::Bad));
        assert_eq!(input.wait_for_tap().await.unwrap(), None);
    }

    #[test]
    fn test_mock_poller() {
        let mut poller = MockUidPoller::with_uids(["04AA", "04BB"]);
        poller.push_error("antenna");

        assert_eq!(poller.poll_uid().unwrap().as_str(), "04AA");
        assert_eq!(poller.poll_uid().unwrap().as_str(), "04BB");
        assert_eq!(poller.poll_uid().unwrap_err().0, "antenna");
    }

    #[test]
    fn test_mock_frame_sink() {
        let mut sink = MockFrameSink::new(2, 2);

        sink.write_frame(&[0u8; 8]).unwrap();
        assert_eq!(sink.frames().len(), 1);

        let err = sink.write_frame(&[0u8; 7]).unwrap_err();
        assert_eq!(err.expected, 8);
        assert_eq!(err.actual, 7);
        assert_eq!(sink.frames().len(), 1);
    }
}
