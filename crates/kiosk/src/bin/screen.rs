//! kiosk-screen: follow the tap pipe and draw the dashboard and popups.

use anyhow::Result;
use clap::Parser;
use kiosk::{shutdown, Args, KioskConfig, ScreenService};
use pipe::PipeSubscriber;
use platform::SystemClock;
use screen::Framebuffer;
use tokio_util::sync::CancellationToken;

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.init()?;
    tracing::info!(
        pipe = %config.pipe.tap_data.display(),
        framebuffer = %config.display.framebuffer.display(),
        width = config.display.width,
        height = config.display.height,
        "screen starting"
    );

    let result = shutdown::run(|cancel| run(config, cancel));
    if let Err(err) = &result {
        tracing::error!("screen stopped: {:#}", err);
    }
    result
}

async fn run(config: KioskConfig, cancel: CancellationToken) -> Result<()> {
    let framebuffer = Framebuffer::new(
        &config.display.framebuffer,
        &config.display.lock,
        config.display.info(),
    );
    let service = ScreenService::new(
        framebuffer,
        SystemClock,
        config.theme(),
        config.popup.duration_secs,
    )?;

    let subscription = PipeSubscriber::new(&config.pipe.tap_data, config.codec()?)
        .with_backoff(config.pipe.reopen_backoff())
        .spawn(config.pipe.queue_depth, cancel.clone());

    service
        .run(subscription, config.display.frame_interval(), &cancel)
        .await?;
    Ok(())
}
