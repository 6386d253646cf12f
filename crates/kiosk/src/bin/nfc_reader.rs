//! kiosk-nfc-reader: log the UID of every card presented to the reader.

use std::io::BufReader;

use anyhow::Result;
use clap::Parser;
use kiosk::{nfc_service, shutdown, Args, KioskConfig, NfcSource};
use nfc::{LinePoller, UidReader};
use pipe::PipePublisher;
use tokio_util::sync::CancellationToken;

/// UIDs buffered between the poll thread and the log loop
const UID_QUEUE_DEPTH: usize = 8;

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.init()?;
    tracing::info!(source = ?config.nfc.source, "nfc reader starting");

    let result = shutdown::run(|cancel| run(config, cancel));
    if let Err(err) = &result {
        tracing::error!("nfc reader stopped: {:#}", err);
    }
    result
}

async fn run(config: KioskConfig, cancel: CancellationToken) -> Result<()> {
    let forward = config.nfc.forward.as_ref().map(PipePublisher::new);

    let seen = match config.nfc.source {
        NfcSource::Stdin => {
            let poller = LinePoller::new(BufReader::new(std::io::stdin()));
            let reader = UidReader::spawn(poller, UID_QUEUE_DEPTH, cancel.clone());
            match nfc_service::run(reader, forward, &cancel).await {
                // End of stdin is a clean stop for the development source.
                Err(nfc_service::NfcServiceError::Reader(nfc::ReaderError::Poll(nfc::LineError::Closed))) => {
                    tracing::info!("UID input closed");
                    None
                }
                other => Some(other?),
            }
        }
        NfcSource::Native => native(forward, &cancel).await?,
    };
    if let Some(seen) = seen {
        tracing::info!(seen, "nfc reader finished");
    }
    Ok(())
}

#[cfg(feature = "libpoll")]
async fn native(forward: Option<PipePublisher>, cancel: &CancellationToken) -> Result<Option<u64>> {
    let reader = UidReader::spawn(nfc::NativePoller::new(), UID_QUEUE_DEPTH, cancel.clone());
    Ok(Some(nfc_service::run(reader, forward, cancel).await?))
}

#[cfg(not(feature = "libpoll"))]
async fn native(_forward: Option<PipePublisher>, _cancel: &CancellationToken) -> Result<Option<u64>> {
    anyhow::bail!("nfc.source = \"native\" requires building with the `libpoll` feature")
}
