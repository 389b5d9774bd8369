use std::collections::VecDeque;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{error, info, warn};

use super::session::{LiveDecision, LiveSession, LiveUpdate};
use crate::model::candle::Candle;
use crate::model::trade::{SweepEvent, TradeOutcome};
use crate::notify::{ChartRenderer, Notifier};
use crate::scorer::SignalScorer;

/// What the trader did with one update. `notified` means a notice was queued
/// for delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum TraderEvent {
    RangeReady { day: NaiveDate, high: f64, low: f64 },
    DayVoided(NaiveDate),
    Signal { decision: LiveDecision, score: f64, notified: bool },
    Resolved { event: SweepEvent, outcome: TradeOutcome, notified: bool },
}

pub struct LiveTrader<S, N> {
    ticker: String,
    threshold: f64,
    session: LiveSession,
    scorer: S,
    notifier: N,
    chart: Option<Box<dyn ChartRenderer + Send>>,
    signalled: Vec<NaiveDate>,
    outbox: VecDeque<Notice>,
}

/// Queued delivery, sent in order.
#[derive(Debug, Clone)]
enum Notice {
    Photo(Vec<u8>),
    Text(String),
}

impl<S: SignalScorer, N: Notifier> LiveTrader<S, N> {
    pub fn new(
        ticker: impl Into<String>,
        threshold: f64,
        session: LiveSession,
        scorer: S,
        notifier: N,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            threshold,
            session,
            scorer,
            notifier,
            chart: None,
            signalled: Vec::new(),
            outbox: VecDeque::new(),
        }
    }

    pub fn with_chart(mut self, chart: Box<dyn ChartRenderer + Send>) -> Self {
        self.chart = Some(chart);
        self
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn session(&self) -> &LiveSession {
        &self.session
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Notices still waiting for delivery.
    pub fn pending_notices(&self) -> usize {
        self.outbox.len()
    }

    /// Feed a refreshed snapshot through the session and act on each update.
    ///
    /// Every update is handled before an error is returned. Notices that
    /// could not be delivered stay queued and go out first on the next
    /// snapshot.
    pub fn on_snapshot(&mut self, candles: &[Candle]) -> Result<Vec<TraderEvent>> {
        let updates = self
            .session
            .poll(candles)
            .context("live session rejected snapshot")?;
        let mut events = Vec::with_capacity(updates.len());
        let mut failure = None;
        for update in updates {
            let event = match update {
                LiveUpdate::RangeReady(range) => TraderEvent::RangeReady {
                    day: range.day,
                    high: range.high,
                    low: range.low,
                },
                LiveUpdate::DayVoided(day) => TraderEvent::DayVoided(day),
                LiveUpdate::Sweep(decision) => match self.on_sweep(candles, decision) {
                    Ok(event) => event,
                    Err(e) => {
                        error!(error = %format!("{:#}", e), "sweep dropped");
                        failure.get_or_insert(e);
                        continue;
                    }
                },
                LiveUpdate::TradeResolved { event, outcome } => self.on_resolved(event, outcome),
            };
            events.push(event);
        }
        if let Err(e) = self.flush() {
            warn!(
                error = %format!("{:#}", e),
                pending = self.outbox.len(),
                "delivery failed, will retry"
            );
            failure.get_or_insert(e);
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(events),
        }
    }

    fn on_sweep(&mut self, candles: &[Candle], decision: LiveDecision) -> Result<TraderEvent> {
        let score = self
            .scorer
            .score(&decision.features)
            .context("failed to score sweep")?;
        info!(
            ticker = %self.ticker,
            direction = %decision.direction,
            score,
            threshold = self.threshold,
            "sweep scored"
        );
        if score < self.threshold {
            return Ok(TraderEvent::Signal {
                decision,
                score,
                notified: false,
            });
        }

        if let Some(chart) = &self.chart {
            match chart.render(candles, &decision) {
                Ok(image) => self.outbox.push_back(Notice::Photo(image)),
                Err(e) => warn!(error = %e, "chart rendering failed, sending text only"),
            }
        }
        self.outbox
            .push_back(Notice::Text(signal_message(&self.ticker, &decision, score)));
        self.signalled.push(decision.event.day);
        Ok(TraderEvent::Signal {
            decision,
            score,
            notified: true,
        })
    }

    fn on_resolved(&mut self, event: SweepEvent, outcome: TradeOutcome) -> TraderEvent {
        let Some(pos) = self.signalled.iter().position(|d| *d == event.day) else {
            return TraderEvent::Resolved {
                event,
                outcome,
                notified: false,
            };
        };
        self.signalled.remove(pos);
        self.outbox.push_back(Notice::Text(format!(
            "{}\n{}\nresult {}",
            self.ticker,
            event.direction,
            outcome.label()
        )));
        TraderEvent::Resolved {
            event,
            outcome,
            notified: true,
        }
    }

    /// Deliver queued notices in order, stopping at the first failure.
    fn flush(&mut self) -> Result<()> {
        while let Some(notice) = self.outbox.front() {
            match notice {
                Notice::Photo(image) => self
                    .notifier
                    .send_photo(image)
                    .context("failed to send chart")?,
                Notice::Text(text) => self
                    .notifier
                    .send_message(text)
                    .context("failed to send message")?,
            }
            self.outbox.pop_front();
        }
        Ok(())
    }
}

pub fn signal_message(ticker: &str, decision: &LiveDecision, score: f64) -> String {
    format!(
        "{}\n{}\nTP prediction\nscore {:.2}\nentry {:.5} stop {:.5}",
        ticker, decision.direction, score, decision.entry_price, decision.stop_price
    )
}
