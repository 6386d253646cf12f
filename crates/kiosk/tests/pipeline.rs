//! Tap input → debounce → delivery queue → FIFO → subscriber.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use kiosk::{touch_service, KioskConfig, TouchStats};
use kiosk_testing::FixtureDir;
use pipe::{PipePublisher, PipeSubscriber, TapRecord};
use platform::mocks::MockTapInput;
use platform::{Clock, TapStatus};
use tokio_util::sync::CancellationToken;
use touch::{DebounceGate, TouchSensor};

const DEADLINE: Duration = Duration::from_secs(5);
const START: f64 = 1_700_000_000.0;

/// Moves forward a quarter second on every reading.
struct SteppingClock {
    readings: AtomicU32,
}

impl Clock for SteppingClock {
    fn now(&self) -> f64 {
        let n = self.readings.fetch_add(1, Ordering::SeqCst);
        START + f64::from(n) * 0.25
    }
}

fn config(dir: &FixtureDir) -> KioskConfig {
    let toml = format!(
        r#"
[pipe]
tap_data = "{}"
timestamp_format = "%Y-%m-%d %H:%M:%S%.3f"
reopen_backoff_ms = 20
publish_retry_ms = 5

[touch]
debounce_secs = 0.5
"#,
        dir.join("tap_data").display()
    );
    let path = dir.file("config.toml", toml.as_bytes()).unwrap();
    KioskConfig::from_file(path).unwrap()
}

#[tokio::test]
async fn debounced_taps_reach_the_screen_side_in_order() {
    let dir = FixtureDir::new().unwrap();
    let config = config(&dir);
    let fifo = dir.fifo("tap_data").unwrap();
    assert_eq!(config.pipe.tap_data, fifo);

    let cancel = CancellationToken::new();
    let codec = config.codec().unwrap();
    let mut subscription = PipeSubscriber::new(&fifo, codec.clone())
        .with_backoff(config.pipe.reopen_backoff())
        .spawn(config.pipe.queue_depth, cancel.clone());

    let (queue, delivery) = pipe::channel(
        PipePublisher::new(&fifo),
        config.pipe.queue_depth,
        config.pipe.publish_retry(),
    );
    let delivery = tokio::spawn(delivery.run(cancel.clone()));

    // Readings at +0, +0.25, +0.5, +0.75, +1.0 against a 0.5 s window.
    let input: MockTapInput = [
        TapStatus::Good,
        TapStatus::Good,
        TapStatus::Bad,
        TapStatus::Good,
        TapStatus::Good,
    ]
    .into_iter()
    .collect();
    let sensor = TouchSensor::new(
        "touch-0",
        DebounceGate::new(config.touch.debounce_secs).unwrap(),
        SteppingClock {
            readings: AtomicU32::new(0),
        },
    );

    let stats = touch_service::run(input, sensor, &codec, &queue, &cancel)
        .await
        .unwrap();
    assert_eq!(
        stats,
        TouchStats {
            accepted: 3,
            suppressed: 2,
            dropped: 0,
        }
    );

    let mut received = Vec::new();
    for _ in 0..3 {
        let record: TapRecord = tokio::time::timeout(DEADLINE, subscription.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        received.push((record.status, record.timestamp.as_secs() - START));
    }
    assert_eq!(
        received,
        [
            (TapStatus::Good, 0.0),
            (TapStatus::Bad, 0.5),
            (TapStatus::Good, 1.0),
        ]
    );

    cancel.cancel();
    assert!(subscription.next().await.unwrap().is_none());
    // The delivery task owns the writer; it closes only now, releasing the
    // subscriber's pending read.
    delivery.await.unwrap().unwrap();
    drop(queue);
}

#[tokio::test]
async fn cancelled_touch_loop_stops_without_input() {
    struct SilentInput;

    impl platform::TapInput for SilentInput {
        type Error = std::convert::Infallible;

        async fn wait_for_tap(&mut self) -> Result<Option<TapStatus>, Self::Error> {
            std::future::pending().await
        }
    }

    let dir = FixtureDir::new().unwrap();
    let config = config(&dir);
    let (queue, _delivery) = pipe::channel(PipePublisher::new(&config.pipe.tap_data), 1, Duration::ZERO);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let sensor = TouchSensor::new(
        "touch-0",
        DebounceGate::new(0.5).unwrap(),
        SteppingClock {
            readings: AtomicU32::new(0),
        },
    );
    let stats = touch_service::run(SilentInput, sensor, &config.codec().unwrap(), &queue, &cancel)
        .await
        .unwrap();
    assert_eq!(stats, TouchStats::default());
}
