//! screen main loop: tap records + refresh ticks → scene → framebuffer.

use std::time::Duration;

use pipe::{PipeError, Subscription, TapRecord};
use platform::{Clock, FrameSink};
use screen::{compose, Canvas, Scene, ScreenState, Theme};
use tokio_util::sync::CancellationToken;

/// Screen loop errors
#[derive(Debug, thiserror::Error)]
pub enum ScreenServiceError {
    /// The tap pipe failed
    #[error(transparent)]
    Pipe(#[from] PipeError),
    /// A frame could not be written
    #[error("failed to write frame: {0}")]
    Frame(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The display is too large to render in memory
    #[error("display {width}x{height} is too large to render")]
    TooLarge {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
}

/// Owns the screen state and repaints the sink whenever the scene changes.
pub struct ScreenService<S, C> {
    sink: S,
    clock: C,
    state: ScreenState,
    theme: Theme,
    canvas: Canvas,
    drawn: Option<Scene>,
}

impl<S, C> ScreenService<S, C>
where
    S: FrameSink,
    C: Clock,
{
    /// Build a service drawing onto `sink`.
    pub fn new(sink: S, clock: C, theme: Theme, popup_duration: f64) -> Result<Self, ScreenServiceError> {
        let info = sink.info();
        let canvas = Canvas::new(info).ok_or(ScreenServiceError::TooLarge {
            width: info.width,
            height: info.height,
        })?;
        Ok(Self {
            sink,
            clock,
            state: ScreenState::new(popup_duration),
            theme,
            canvas,
            drawn: None,
        })
    }

    /// The sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The screen state
    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    /// Apply one record and repaint. Returns `true` if a frame was written.
    pub fn handle_record(&mut self, record: &TapRecord) -> Result<bool, ScreenServiceError> {
        let now = self.clock.now();
        tracing::info!(status = %record.status, timestamp = record.timestamp.as_secs(), "tap record");
        self.state.apply(record, now);
        let scene = self.state.scene(now);
        // A repeated popup restarts its timer but looks the same.
        self.draw(scene)
    }

    /// Advance the state to the clock and repaint if the scene changed.
    pub fn handle_tick(&mut self) -> Result<bool, ScreenServiceError> {
        let scene = self.state.tick(self.clock.now());
        self.draw(scene)
    }

    /// Paint the initial scene, then follow `subscription` until it ends or
    /// `cancel` fires.
    pub async fn run(
        mut self,
        mut subscription: Subscription,
        frame_interval: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), ScreenServiceError> {
        self.handle_tick()?;
        let mut ticks = tokio::time::interval(frame_interval);
        ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = cancel.cancelled() => return Ok(()),
                record = subscription.next() => match record? {
                    Some(record) => {
                        self.handle_record(&record)?;
                    }
                    None => return Ok(()),
                },
                _ = ticks.tick() => {
                    self.handle_tick()?;
                }
            }
        }
    }

    fn draw(&mut self, scene: Scene) -> Result<bool, ScreenServiceError> {
        if self.drawn == Some(scene) {
            return Ok(false);
        }
        if let Err(never) = compose(&scene, &self.theme, &mut self.canvas) {
            match never {}
        }
        self.sink
            .write_frame(&self.canvas.to_raw())
            .map_err(|e| ScreenServiceError::Frame(Box::new(e)))?;
        tracing::debug!(?scene, "frame drawn");
        self.drawn = Some(scene);
        Ok(true)
    }
}
