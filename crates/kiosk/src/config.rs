//! Shared configuration file.
//!
//! All three processes read the same TOML file so both ends of the tap pipe
//! agree on its path and timestamp format. Every field has a default; an
//! empty file is a valid configuration.
//!
//! ```toml
//! [log]
//! level = "info"
//!
//! [pipe]
//! tap_data = "/run/kiosk-bridge/tap_data"
//! timestamp_format = "%Y-%m-%d %H:%M:%S"
//!
//! [touch]
//! debounce_secs = 0.5
//!
//! [display]
//! width = 480
//! height = 320
//! frame_rate = 10
//!
//! [popup]
//! duration_secs = 3.0
//! error_bg_color = "#C00000"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use pipe::{CodecError, RecordCodec};
use platform::config::{
    DEFAULT_CONFIG_PATH, DEFAULT_DEBOUNCE_SECS, DEFAULT_FRAMEBUFFER_LOCK_PATH,
    DEFAULT_FRAMEBUFFER_PATH, DEFAULT_PUBLISH_RETRY, DEFAULT_REOPEN_BACKOFF, DEFAULT_TAP_DATA_PIPE,
    DEFAULT_TIMESTAMP_FORMAT,
};
use platform::DisplayInfo;
use screen::{HexColor, Palette, Theme};
use serde::{Deserialize, Serialize};

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("failed to read config file '{}': {source}", path.display())]
    Io {
        /// Path to the file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML (including malformed colours)
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Dotted field name
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// The timestamp format is rejected by the codec
    #[error("invalid value for pipe.timestamp_format: {0}")]
    TimestampFormat(#[from] CodecError),
}

/// Log level
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Very verbose
    Trace,
    /// Debugging information
    Debug,
    /// Normal operation
    #[default]
    Info,
    /// Warnings only
    Warn,
    /// Errors only
    Error,
}

impl LogLevel {
    /// Filter directive for `EnvFilter`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// `[log]`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Base level; `RUST_LOG` overrides it
    pub level: LogLevel,
}

/// `[pipe]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PipeConfig {
    /// FIFO carrying tap records
    pub tap_data: PathBuf,
    /// strftime format of the record timestamp (UTC)
    pub timestamp_format: String,
    /// Subscriber wait before reopening after the writer closed
    pub reopen_backoff_ms: u64,
    /// Publisher wait between attempts while no reader is attached
    pub publish_retry_ms: u64,
    /// Records buffered on either side of the pipe
    pub queue_depth: usize,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            tap_data: PathBuf::from(DEFAULT_TAP_DATA_PIPE),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_owned(),
            reopen_backoff_ms: duration_ms(DEFAULT_REOPEN_BACKOFF),
            publish_retry_ms: duration_ms(DEFAULT_PUBLISH_RETRY),
            queue_depth: pipe::CHANNEL_DEPTH,
        }
    }
}

impl PipeConfig {
    /// Reopen backoff
    pub fn reopen_backoff(&self) -> Duration {
        Duration::from_millis(self.reopen_backoff_ms)
    }

    /// Publish retry interval
    pub fn publish_retry(&self) -> Duration {
        Duration::from_millis(self.publish_retry_ms)
    }
}

/// `[touch]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TouchConfig {
    /// Identity stamped on every tap event
    pub device_id: String,
    /// Minimum interval between accepted taps, seconds
    pub debounce_secs: f64,
    /// Line-oriented tap source (`GOOD` / `BAD` per line); stdin when unset
    pub input: Option<PathBuf>,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            device_id: "touch-0".to_owned(),
            debounce_secs: DEFAULT_DEBOUNCE_SECS,
            input: None,
        }
    }
}

/// `[display]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Framebuffer device
    pub framebuffer: PathBuf,
    /// Lock file held during frame writes
    pub lock: PathBuf,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Screen state refreshes per second
    pub frame_rate: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            framebuffer: PathBuf::from(DEFAULT_FRAMEBUFFER_PATH),
            lock: PathBuf::from(DEFAULT_FRAMEBUFFER_LOCK_PATH),
            width: 480,
            height: 320,
            frame_rate: 10,
        }
    }
}

impl DisplayConfig {
    /// Display geometry
    pub fn info(&self) -> DisplayInfo {
        DisplayInfo::new(self.width, self.height)
    }

    /// Interval between state refreshes
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate.max(1)
    }
}

/// `[dashboard]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Font height in pixels
    pub font_size: u32,
    /// Text colour
    pub font_color: HexColor,
    /// Background colour
    pub bg_color: HexColor,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let theme = Theme::default();
        Self {
            font_size: theme.dashboard_font_size,
            font_color: theme.dashboard.foreground,
            bg_color: theme.dashboard.background,
        }
    }
}

/// `[popup]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PopupConfig {
    /// How long a popup stays up, seconds
    pub duration_secs: f64,
    /// Font height in pixels
    pub font_size: u32,
    /// Text colour
    pub font_color: HexColor,
    /// Background of the GOOD popup
    pub tap_event_bg_color: HexColor,
    /// Background of the BAD popup
    pub error_bg_color: HexColor,
    /// Text of the GOOD popup
    pub tap_event_message: String,
    /// Text of the BAD popup
    pub error_message: String,
}

impl Default for PopupConfig {
    fn default() -> Self {
        let theme = Theme::default();
        Self {
            duration_secs: 3.0,
            font_size: theme.popup_font_size,
            font_color: theme.tap_event.foreground,
            tap_event_bg_color: theme.tap_event.background,
            error_bg_color: theme.error.background,
            tap_event_message: theme.tap_event_message,
            error_message: theme.error_message,
        }
    }
}

/// UID source for the NFC reader
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NfcSource {
    /// One UID per line on stdin
    #[default]
    Stdin,
    /// The vendor's libpoll (requires the `libpoll` feature)
    Native,
}

/// `[nfc]`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct NfcConfig {
    /// Where UIDs come from
    pub source: NfcSource,
    /// FIFO to forward UIDs to, one per line; log only when unset
    pub forward: Option<PathBuf>,
}

/// Whole configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct KioskConfig {
    /// Logging
    pub log: LogConfig,
    /// Tap pipe
    pub pipe: PipeConfig,
    /// Tap input and debounce
    pub touch: TouchConfig,
    /// Framebuffer
    pub display: DisplayConfig,
    /// Dashboard look
    pub dashboard: DashboardConfig,
    /// Popup look and timing
    pub popup: PopupConfig,
    /// NFC reader
    pub nfc: NfcConfig,
}

impl KioskConfig {
    /// Load and validate a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        contents.parse()
    }

    /// Load `path` if given, else [`DEFAULT_CONFIG_PATH`] if it exists, else
    /// the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }

    /// Check ranges the types cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_owned(),
            })
        };

        if !(self.touch.debounce_secs.is_finite() && self.touch.debounce_secs >= 0.0) {
            return invalid("touch.debounce_secs", "must be a finite, non-negative number");
        }
        if self.display.width == 0 || self.display.height == 0 {
            return invalid("display", "width and height must be non-zero");
        }
        if self.display.info().frame_len().is_none() {
            return invalid("display", "frame size overflows");
        }
        if self.display.frame_rate == 0 {
            return invalid("display.frame_rate", "must be non-zero");
        }
        if !(self.popup.duration_secs.is_finite() && self.popup.duration_secs >= 0.0) {
            return invalid("popup.duration_secs", "must be a finite, non-negative number");
        }
        if self.pipe.queue_depth == 0 {
            return invalid("pipe.queue_depth", "must be non-zero");
        }
        self.codec()?;
        Ok(())
    }

    /// Codec for the configured timestamp format
    pub fn codec(&self) -> Result<RecordCodec, CodecError> {
        RecordCodec::new(self.pipe.timestamp_format.as_str())
    }

    /// Screen theme from `[dashboard]` and `[popup]`
    pub fn theme(&self) -> Theme {
        let popup_palette = |background| Palette {
            background,
            foreground: self.popup.font_color,
        };
        Theme {
            dashboard: Palette {
                background: self.dashboard.bg_color,
                foreground: self.dashboard.font_color,
            },
            dashboard_font_size: self.dashboard.font_size,
            tap_event: popup_palette(self.popup.tap_event_bg_color),
            error: popup_palette(self.popup.error_bg_color),
            popup_font_size: self.popup.font_size,
            tap_event_message: self.popup.tap_event_message.clone(),
            error_message: self.popup.error_message.clone(),
        }
    }
}

impl FromStr for KioskConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: KioskConfig = "".parse().unwrap();
        assert_eq!(config, KioskConfig::default());
        assert_eq!(config.pipe.tap_data, Path::new(DEFAULT_TAP_DATA_PIPE));
        assert_eq!(config.pipe.timestamp_format, "%Y-%m-%d %H:%M:%S");
        assert_eq!(config.pipe.reopen_backoff(), Duration::from_secs(1));
        assert_eq!(config.touch.debounce_secs, 0.5);
        assert_eq!(config.log.level, LogLevel::Info);
        assert_eq!(config.nfc.source, NfcSource::Stdin);
    }

    #[test]
    fn full_config_parses() {
        let config: KioskConfig = r##"
[log]
level = "debug"

[pipe]
tap_data = "/tmp/tap"
timestamp_format = "%s"
reopen_backoff_ms = 200
publish_retry_ms = 50
queue_depth = 4

[touch]
device_id = "front"
debounce_secs = 0.25
input = "/dev/ttyTAP"

[display]
framebuffer = "/dev/fb0"
lock = "/tmp/fb.lock"
width = 320
height = 240
frame_rate = 20

[dashboard]
font_size = 10
font_color = "#00FF00"
bg_color = "#101010"

[popup]
duration_secs = 1.5
font_size = 20
font_color = "#FFFFFF"
tap_event_bg_color = "#008000"
error_bg_color = "#ff0000"
tap_event_message = "Thanks"
error_message = "Try again"

[nfc]
source = "native"
forward = "/run/kiosk-bridge/uid"
"##
        .parse()
        .unwrap();

        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.pipe.publish_retry(), Duration::from_millis(50));
        assert_eq!(config.touch.input.as_deref(), Some(Path::new("/dev/ttyTAP")));
        assert_eq!(config.display.frame_interval(), Duration::from_millis(50));
        assert_eq!(config.nfc.source, NfcSource::Native);

        let theme = config.theme();
        assert_eq!(theme.error.background, HexColor::new(0xFF, 0, 0));
        assert_eq!(theme.dashboard.foreground, HexColor::new(0, 0xFF, 0));
        assert_eq!(theme.error_message, "Try again");
    }

    #[test]
    fn rejects_out_of_range_values() {
        for (toml, field) in [
            ("[touch]\ndebounce_secs = -0.1", "touch.debounce_secs"),
            ("[touch]\ndebounce_secs = nan", "touch.debounce_secs"),
            ("[display]\nwidth = 0", "display"),
            ("[display]\nframe_rate = 0", "display.frame_rate"),
            ("[popup]\nduration_secs = inf", "popup.duration_secs"),
            ("[pipe]\nqueue_depth = 0", "pipe.queue_depth"),
        ] {
            match toml.parse::<KioskConfig>() {
                Err(ConfigError::Invalid { field: got, .. }) => assert_eq!(got, field, "{toml}"),
                other => unreachable!("{toml}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_bad_timestamp_format() {
        let err = "[pipe]\ntimestamp_format = \"\"".parse::<KioskConfig>().unwrap_err();
        assert!(matches!(err, ConfigError::TimestampFormat(CodecError::EmptyFormat)));
    }

    #[test]
    fn rejects_date_only_timestamp_format() {
        let err = "[pipe]\ntimestamp_format = \"%Y-%m-%d\"".parse::<KioskConfig>().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TimestampFormat(CodecError::IncompleteFormat { .. })
        ));
    }

    #[test]
    fn rejects_bad_colour() {
        let err = "[dashboard]\nbg_color = \"black\"".parse::<KioskConfig>().unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("black"));
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!("[pipe]\npath = \"/tmp/tap\"".parse::<KioskConfig>().is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = KioskConfig::from_file("/nonexistent/kiosk.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
