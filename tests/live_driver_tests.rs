mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::sync::watch;

use asia_sweep::config::EngineConfig;
use asia_sweep::io::CandleFeed;
use asia_sweep::live::{run_live, LiveSession, LiveTrader};
use asia_sweep::model::candle::Candle;
use asia_sweep::model::feature::FeatureVector;
use asia_sweep::notify::Notifier;
use asia_sweep::scorer::SignalScorer;

use common::{at, Tape, SHORT_SWEEP};

struct StaticFeed(Vec<Candle>);

impl CandleFeed for StaticFeed {
    fn load(&self) -> Result<Vec<Candle>> {
        Ok(self.0.clone())
    }
}

struct BrokenFeed;

impl CandleFeed for BrokenFeed {
    fn load(&self) -> Result<Vec<Candle>> {
        Err(anyhow!("price file missing"))
    }
}

struct AlwaysConfident;

impl SignalScorer for AlwaysConfident {
    fn score(&self, _features: &FeatureVector) -> Result<f64> {
        Ok(1.0)
    }
}

#[derive(Clone, Default)]
struct Inbox(Arc<Mutex<Vec<String>>>);

impl Notifier for Inbox {
    fn send_message(&self, text: &str) -> Result<()> {
        self.0.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn send_photo(&self, _image: &[u8]) -> Result<()> {
        Ok(())
    }
}

fn trader(inbox: Inbox) -> LiveTrader<AlwaysConfident, Inbox> {
    LiveTrader::new(
        "EURUSD",
        0.5,
        LiveSession::new(EngineConfig::default()),
        AlwaysConfident,
        inbox,
    )
}

fn stop_after(ms: u64) -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        let _ = tx.send(true);
    });
    rx
}

#[test]
fn polls_until_shutdown_and_signals_once() {
    let inbox = Inbox::default();
    let candles = Tape::new().day("2024-05-06", &[at(10, SHORT_SWEEP)]).build();
    let summary = tokio_test::block_on(async {
        let shutdown = stop_after(80);
        run_live(
            StaticFeed(candles),
            trader(inbox.clone()),
            Duration::from_millis(10),
            shutdown,
        )
        .await
    })
    .unwrap();

    assert!(summary.polls >= 1);
    assert_eq!(summary.failures, 0);
    let messages = inbox.0.lock().unwrap().clone();
    // Repeated snapshots do not repeat the signal.
    assert_eq!(
        messages
            .iter()
            .filter(|m| m.contains("TP prediction"))
            .count(),
        1
    );
}

#[test]
fn feed_errors_are_counted_and_polling_continues() {
    let summary = tokio_test::block_on(async {
        let shutdown = stop_after(50);
        run_live(
            BrokenFeed,
            trader(Inbox::default()),
            Duration::from_millis(10),
            shutdown,
        )
        .await
    })
    .unwrap();
    assert_eq!(summary.polls, 0);
    assert!(summary.failures >= 1);
}

#[test]
fn already_cancelled_driver_returns_immediately() {
    let (_tx, rx) = watch::channel(true);
    let summary = tokio_test::block_on(run_live(
        StaticFeed(Vec::new()),
        trader(Inbox::default()),
        Duration::from_secs(3600),
        rx,
    ))
    .unwrap();
    assert_eq!(summary.polls, 0);
    assert_eq!(summary.failures, 0);
}
