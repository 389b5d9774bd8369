use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

use super::trader::LiveTrader;
use crate::io::CandleFeed;
use crate::model::candle::Candle;
use crate::notify::Notifier;
use crate::scorer::SignalScorer;

/// Counters reported when the live loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub polls: u64,
    pub failures: u64,
}

/// Poll `feed` every `poll_every` and hand each snapshot to `trader` on a
/// blocking worker until `shutdown` flips to `true`.
///
/// A tick that arrives while the worker is still busy is skipped. Feed and
/// trader errors are logged and polling continues.
pub async fn run_live<F, S, N>(
    feed: F,
    trader: LiveTrader<S, N>,
    poll_every: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> Result<PollSummary>
where
    F: CandleFeed,
    S: SignalScorer + Send + 'static,
    N: Notifier + Send + 'static,
{
    let (snapshot_tx, mut snapshot_rx) = mpsc::channel::<Vec<Candle>>(1);
    let worker = tokio::task::spawn_blocking(move || {
        let mut trader = trader;
        let mut summary = PollSummary::default();
        while let Some(candles) = snapshot_rx.blocking_recv() {
            summary.polls += 1;
            match trader.on_snapshot(&candles) {
                Ok(events) => {
                    tracing::debug!(candles = candles.len(), events = events.len(), "Poll done")
                }
                Err(e) => {
                    summary.failures += 1;
                    tracing::error!(error = %format!("{:#}", e), "Poll failed");
                }
            }
        }
        summary
    });

    let mut ticker = tokio::time::interval(poll_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut load_failures = 0u64;

    if !*shutdown.borrow() {
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let candles = match feed.load() {
                        Ok(candles) => candles,
                        Err(e) => {
                            load_failures += 1;
                            tracing::error!(error = %format!("{:#}", e), "Candle feed failed");
                            continue;
                        }
                    };
                    match snapshot_tx.try_send(candles) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => {
                            tracing::debug!("Previous poll still running, skipping tick");
                        }
                        Err(TrySendError::Closed(_)) => {
                            tracing::warn!("Poll worker stopped");
                            break;
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("Live driver shutting down");
                        break;
                    }
                }
            }
        }
    }

    drop(snapshot_tx);
    let mut summary = worker.await.context("poll worker panicked")?;
    summary.failures += load_failures;
    Ok(summary)
}
