//! Tap input abstraction

use serde::{Deserialize, Serialize};

/// Tap input trait for the kiosk's touch line
pub trait TapInput {
    /// Error type for input failures
    type Error: std::error::Error + Send + Sync + 'static;

    /// Wait for the next physical tap edge.
    ///
    /// Returns `Ok(None)` once the input is exhausted and no further edges
    /// will arrive.
    async fn wait_for_tap(&mut self) -> Result<Option<TapStatus>, Self::Error>;
}

/// Outcome attached to a tap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TapStatus {
    /// Tap accepted by the terminal
    Good,
    /// Tap rejected by the terminal
    Bad,
}

impl TapStatus {
    /// Wire name of the status
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "GOOD",
            Self::Bad => "BAD",
        }
    }
}

impl core::fmt::Display for TapStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for TapStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            s if s.eq_ignore_ascii_case("good") => Ok(Self::Good),
            s if s.eq_ignore_ascii_case("bad") => Ok(Self::Bad),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// A status string that is neither `GOOD` nor `BAD`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tap status '{0}'")]
pub struct UnknownStatus(pub String);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("good".parse::<TapStatus>().unwrap(), TapStatus::Good);
        assert_eq!(" BAD \n".parse::<TapStatus>().unwrap(), TapStatus::Bad);
    }

    #[test]
    fn rejects_unknown_status() {
        let err = "maybe".parse::<TapStatus>().unwrap_err();
        assert!(err.to_string().contains("maybe"));
    }

    #[test]
    fn serialises_uppercase() {
        assert_eq!(serde_json::to_string(&TapStatus::Good).unwrap(), "\"GOOD\"");
        assert_eq!(
            serde_json::from_str::<TapStatus>("\"BAD\"").unwrap(),
            TapStatus::Bad
        );
    }
}
