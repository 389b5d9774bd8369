use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::watch;

use asia_sweep::config::Config;
use asia_sweep::io::CsvCandleFeed;
use asia_sweep::live::{run_live, LiveSession, LiveTrader};
use asia_sweep::notify::TelegramNotifier;
use asia_sweep::scorer::LogisticScorer;

type Trader = LiveTrader<LogisticScorer, TelegramNotifier>;

fn build_trader(config: &Config) -> Result<Trader> {
    let scorer = LogisticScorer::load(&config.live.model_path)?;
    let notifier = TelegramNotifier::from_config(&config.telegram)
        .context("telegram notifier is not configured")?;
    let session = LiveSession::new(config.engine.clone());
    Ok(LiveTrader::new(
        config.live.ticker.clone(),
        config.live.score_threshold,
        session,
        scorer,
        notifier,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Make sure config/default.toml exists and .env sets TELEGRAM_TOKEN and TELEGRAM_CHAT_ID");
            std::process::exit(1);
        }
    };

    asia_sweep::logging::init(&config.logging);

    tracing::info!(
        ticker = %config.live.ticker,
        candles = %config.live.candles_path.display(),
        poll_secs = config.live.poll_interval_secs,
        threshold = config.live.score_threshold,
        "Starting asia-sweep live monitor"
    );

    // The blocking HTTP client must be built off the async workers.
    let trader_config = config.clone();
    let trader = tokio::task::spawn_blocking(move || build_trader(&trader_config))
        .await
        .context("trader setup panicked")??;
    let feed = CsvCandleFeed::new(config.live.candles_path.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Ctrl+C received");
        let _ = shutdown_tx.send(true);
    });

    let summary = run_live(
        feed,
        trader,
        Duration::from_secs(config.live.poll_interval_secs),
        shutdown_rx,
    )
    .await?;
    tracing::info!(
        polls = summary.polls,
        failures = summary.failures,
        "Live monitor stopped"
    );
    Ok(())
}
