//! kiosk-touch-sensor: debounce tap edges and publish them to the tap pipe.

use anyhow::{Context, Result};
use clap::Parser;
use kiosk::{shutdown, touch_service, Args, KioskConfig, LineTapInput};
use pipe::PipePublisher;
use platform::SystemClock;
use tokio::io::{AsyncBufRead, BufReader};
use tokio_util::sync::CancellationToken;
use touch::{DebounceGate, TouchSensor};

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.init()?;
    tracing::info!(
        pipe = %config.pipe.tap_data.display(),
        debounce_secs = config.touch.debounce_secs,
        "touch sensor starting"
    );

    let result = shutdown::run(|cancel| run(config, cancel));
    if let Err(err) = &result {
        tracing::error!("touch sensor stopped: {:#}", err);
    }
    result
}

async fn run(config: KioskConfig, cancel: CancellationToken) -> Result<()> {
    let codec = config.codec()?;
    let gate = DebounceGate::new(config.touch.debounce_secs)?;
    let sensor = TouchSensor::new(config.touch.device_id.as_str(), gate, SystemClock);

    let (queue, delivery) = pipe::channel(
        PipePublisher::new(&config.pipe.tap_data),
        config.pipe.queue_depth,
        config.pipe.publish_retry(),
    );
    let delivery = tokio::spawn(delivery.run(cancel.clone()));

    let input: Box<dyn AsyncBufRead + Unpin + Send> = match &config.touch.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open tap input '{}'", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let stats = touch_service::run(LineTapInput::new(input), sensor, &codec, &queue, &cancel).await?;
    tracing::info!(
        accepted = stats.accepted,
        suppressed = stats.suppressed,
        dropped = stats.dropped,
        "tap input finished"
    );

    // Closing the queue lets delivery drain what is left, unless cancelled.
    drop(queue);
    delivery.await??;
    Ok(())
}
