//! Shared defaults
//!
//! Defaults for the configuration file live here so that every process and
//! the developer tooling agree on them without reading each other's code.

use std::time::Duration;

/// Default location of the shared configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/kiosk-bridge/config.toml";

/// Default FIFO carrying tap records from touch-sensor to screen
pub const DEFAULT_TAP_DATA_PIPE: &str = "/run/kiosk-bridge/tap_data";

/// strftime format for wire timestamps (rendered in UTC)
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Subscriber wait between end-of-stream and reopening the FIFO
pub const DEFAULT_REOPEN_BACKOFF: Duration = Duration::from_secs(1);

/// Publisher wait between attempts while no reader is attached
pub const DEFAULT_PUBLISH_RETRY: Duration = Duration::from_millis(250);

/// Largest write the kernel guarantees to be atomic on a pipe (Linux `PIPE_BUF`)
pub const PIPE_BUF_LEN: usize = 4096;

/// Default minimum interval between two accepted taps, in seconds
pub const DEFAULT_DEBOUNCE_SECS: f64 = 0.5;

/// Default framebuffer device
pub const DEFAULT_FRAMEBUFFER_PATH: &str = "/dev/fb1";

/// Default framebuffer lock file
pub const DEFAULT_FRAMEBUFFER_LOCK_PATH: &str = "/run/kiosk-bridge/fb.lock";
