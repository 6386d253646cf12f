//! Flags shared by every binary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::{KioskConfig, LogLevel};
use crate::logging::init_logging;

/// Common command line
#[derive(Debug, Parser)]
pub struct Args {
    /// Configuration file [default: /etc/kiosk-bridge/config.toml if present]
    #[arg(short, long, env = "KIOSK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override `[log] level`
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}

impl Args {
    /// Load the configuration and install logging.
    pub fn init(&self) -> Result<KioskConfig> {
        let config = KioskConfig::load(self.config.as_deref()).context("failed to load configuration")?;
        let level = self.log_level.unwrap_or(config.log.level);
        init_logging(level.as_str())?;
        Ok(config)
    }
}
