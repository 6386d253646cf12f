use anyhow::{Context, Result};
use colored::Colorize;
use kiosk::KioskConfig;
use std::path::{Path, PathBuf};

/// Outcome for one FIFO path
#[derive(Debug, PartialEq, Eq)]
enum Created {
    New,
    Existing,
}

pub fn run(config: Option<&Path>) -> Result<()> {
    let config = KioskConfig::load(config).context("Failed to load configuration")?;

    println!();
    println!("{}", "🔧 Creating FIFOs...".cyan().bold());
    println!();

    for path in fifo_paths(&config) {
        match ensure(&path)? {
            Created::New => println!("{}", format!("  ✓ created {}", path.display()).green()),
            Created::Existing => println!("  • {} already exists", path.display()),
        }
    }
    println!();
    Ok(())
}

/// Every FIFO the processes open: the tap pipe, plus the UID forward pipe
/// when configured.
fn fifo_paths(config: &KioskConfig) -> Vec<PathBuf> {
    let mut paths = vec![config.pipe.tap_data.clone()];
    paths.extend(config.nfc.forward.clone());
    paths
}

fn ensure(path: &Path) -> Result<Created> {
    if kiosk_testing::is_fifo(path) {
        return Ok(Created::Existing);
    }
    if path.exists() {
        anyhow::bail!("{} exists and is not a FIFO", path.display());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    kiosk_testing::make_fifo(path)
        .with_context(|| format!("Failed to create FIFO {}", path.display()))?;
    Ok(Created::New)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_fifos_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run/tap_data");

        assert_eq!(ensure(&path).unwrap(), Created::New);
        assert!(kiosk_testing::is_fifo(&path));
        assert_eq!(ensure(&path).unwrap(), Created::Existing);
    }

    #[test]
    fn refuses_to_replace_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tap_data");
        std::fs::write(&path, b"").unwrap();

        assert!(ensure(&path).is_err());
    }

    #[test]
    fn forward_pipe_is_included_when_configured() {
        let config: KioskConfig = "[nfc]\nforward = \"/run/kiosk-bridge/uid\"".parse().unwrap();
        assert_eq!(
            fifo_paths(&config),
            [
                PathBuf::from("/run/kiosk-bridge/tap_data"),
                PathBuf::from("/run/kiosk-bridge/uid"),
            ]
        );
    }
}
