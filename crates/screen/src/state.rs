//! What the screen shows: the daily dashboard or a timed popup.

use pipe::TapRecord;
use platform::{TapStatus, Timestamp};

/// Seconds in a UTC day
pub const DAY_SECS: f64 = 86_400.0;

/// `true` if `to` falls on a later UTC day than `from`.
///
/// Both timestamps are truncated to the start of their day before
/// comparing, so 23:59:59 → 00:00:00 counts as a new day.
pub fn is_at_least_next_day(from: f64, to: f64) -> bool {
    let from_day = from - from.rem_euclid(DAY_SECS);
    let to_day = to - to.rem_euclid(DAY_SECS);
    to_day > from_day
}

/// Which popup is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupKind {
    /// A GOOD tap
    TapEvent,
    /// A BAD tap
    Error,
}

impl From<TapStatus> for PopupKind {
    fn from(status: TapStatus) -> Self {
        match status {
            TapStatus::Good => Self::TapEvent,
            TapStatus::Bad => Self::Error,
        }
    }
}

/// Daily tap counters
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dashboard {
    /// GOOD taps today
    pub good: u32,
    /// BAD taps today
    pub bad: u32,
    /// Most recent tap, if any
    pub last_tap: Option<Timestamp>,
}

/// One frame's worth of content
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scene {
    /// Counters for the current day
    Dashboard(Dashboard),
    /// A popup in front of the dashboard
    Popup(PopupKind),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Popup {
    kind: PopupKind,
    until: f64,
}

/// Screen state driven by tap records and the screen's own clock.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenState {
    dashboard: Dashboard,
    /// Time the current counting day was opened
    day_opened: Option<f64>,
    popup: Option<Popup>,
    popup_duration: f64,
}

impl ScreenState {
    /// Empty dashboard; popups last `popup_duration` seconds.
    pub fn new(popup_duration: f64) -> Self {
        Self {
            dashboard: Dashboard::default(),
            day_opened: None,
            popup: None,
            popup_duration,
        }
    }

    /// Current counters
    pub fn dashboard(&self) -> Dashboard {
        self.dashboard
    }

    /// Count `record` and show its popup from `now`, replacing any popup
    /// already showing.
    pub fn apply(&mut self, record: &TapRecord, now: f64) {
        let at = record.timestamp.as_secs();
        self.roll_day(at);
        if self.day_opened.is_none() {
            self.day_opened = Some(at);
        }

        match record.status {
            TapStatus::Good => self.dashboard.good = self.dashboard.good.saturating_add(1),
            TapStatus::Bad => self.dashboard.bad = self.dashboard.bad.saturating_add(1),
        }
        self.dashboard.last_tap = Some(record.timestamp);
        self.popup = Some(Popup {
            kind: record.status.into(),
            until: now + self.popup_duration,
        });
    }

    /// Advance to `now` without a record: drop an expired popup and roll
    /// the day over. Returns the scene to draw.
    pub fn tick(&mut self, now: f64) -> Scene {
        if self.popup.is_some_and(|popup| now >= popup.until) {
            self.popup = None;
        }
        self.roll_day(now);
        self.scene(now)
    }

    /// Scene to draw at `now`.
    pub fn scene(&self, now: f64) -> Scene {
        match self.popup {
            Some(popup) if now < popup.until => Scene::Popup(popup.kind),
            _ => Scene::Dashboard(self.dashboard),
        }
    }

    fn roll_day(&mut self, at: f64) {
        if let Some(opened) = self.day_opened {
            if is_at_least_next_day(opened, at) {
                tracing::info!(good = self.dashboard.good, bad = self.dashboard.bad, "new day, resetting counters");
                self.dashboard.good = 0;
                self.dashboard.bad = 0;
                self.day_opened = None;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic)]
mod tests {
    use super::*;

    fn record(status: TapStatus, secs: f64) -> TapRecord {
        TapRecord {
            status,
            timestamp: Timestamp::from_secs(secs).unwrap(),
        }
    }

    #[test]
    fn next_day_compares_day_starts() {
        assert!(!is_at_least_next_day(0.0, DAY_SECS - 1.0));
        assert!(is_at_least_next_day(DAY_SECS - 1.0, DAY_SECS));
        assert!(is_at_least_next_day(10.0, 3.0 * DAY_SECS));
        assert!(!is_at_least_next_day(DAY_SECS, 10.0));
        assert!(is_at_least_next_day(-1.0, 0.0));
    }

    #[test]
    fn good_and_bad_taps_are_counted() {
        let mut state = ScreenState::new(3.0);
        state.apply(&record(TapStatus::Good, 100.0), 0.0);
        state.apply(&record(TapStatus::Good, 101.0), 0.0);
        state.apply(&record(TapStatus::Bad, 102.0), 0.0);

        let dashboard = state.dashboard();
        assert_eq!((dashboard.good, dashboard.bad), (2, 1));
        assert_eq!(dashboard.last_tap.unwrap().as_secs(), 102.0);
    }

    #[test]
    fn status_selects_popup() {
        let mut state = ScreenState::new(3.0);
        state.apply(&record(TapStatus::Good, 0.0), 10.0);
        assert_eq!(state.scene(10.0), Scene::Popup(PopupKind::TapEvent));

        state.apply(&record(TapStatus::Bad, 1.0), 11.0);
        assert_eq!(state.scene(11.0), Scene::Popup(PopupKind::Error));
    }

    #[test]
    fn popup_expires_after_duration() {
        let mut state = ScreenState::new(3.0);
        state.apply(&record(TapStatus::Good, 0.0), 10.0);

        assert_eq!(state.tick(12.9), Scene::Popup(PopupKind::TapEvent));
        assert!(matches!(state.tick(13.0), Scene::Dashboard(_)));
        assert!(matches!(state.scene(12.0), Scene::Dashboard(_)));
    }

    #[test]
    fn new_popup_restarts_duration() {
        let mut state = ScreenState::new(3.0);
        state.apply(&record(TapStatus::Good, 0.0), 10.0);
        state.apply(&record(TapStatus::Bad, 2.0), 12.0);
        assert_eq!(state.tick(14.0), Scene::Popup(PopupKind::Error));
    }

    #[test]
    fn counters_reset_on_later_day_record() {
        let mut state = ScreenState::new(0.0);
        state.apply(&record(TapStatus::Good, DAY_SECS - 10.0), 0.0);
        state.apply(&record(TapStatus::Bad, DAY_SECS - 5.0), 0.0);
        state.apply(&record(TapStatus::Good, DAY_SECS + 5.0), 0.0);

        let dashboard = state.dashboard();
        assert_eq!((dashboard.good, dashboard.bad), (1, 0));
    }

    #[test]
    fn counters_reset_on_tick_past_midnight() {
        let mut state = ScreenState::new(0.0);
        state.apply(&record(TapStatus::Good, 100.0), 0.0);

        state.tick(DAY_SECS - 1.0);
        assert_eq!(state.dashboard().good, 1);
        let Scene::Dashboard(dashboard) = state.tick(DAY_SECS) else {
            panic!("expected dashboard");
        };
        assert_eq!((dashboard.good, dashboard.bad), (0, 0));
        assert_eq!(dashboard.last_tap.unwrap().as_secs(), 100.0);
    }
}
