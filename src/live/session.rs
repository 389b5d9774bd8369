use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::AppError;
use crate::features::assembler::build_row;
use crate::features::extractor::FeatureExtractor;
use crate::indicator::{round_to, IndicatorSet, PRICE_DECIMALS};
use crate::model::candle::{validate_candles, Candle};
use crate::model::feature::FeatureVector;
use crate::model::range::SessionRange;
use crate::model::signal::Direction;
use crate::model::trade::{SweepEvent, TradeOutcome};
use crate::session::Session;
use crate::strategy::range_tracker::RangeTracker;
use crate::strategy::sweep_detector::{SweepDetector, SweepScan};
use crate::strategy::trade_simulator::TradeSimulator;

#[derive(Debug, Clone, PartialEq)]
pub enum LivePhase {
    AwaitingRange,
    Watching(SessionRange),
    Voided,
    Signalled,
}

/// What the scorer sees when a sweep fires.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveDecision {
    pub event: SweepEvent,
    pub direction: Direction,
    pub entry_price: f64,
    pub stop_price: f64,
    pub features: FeatureVector,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiveUpdate {
    RangeReady(SessionRange),
    DayVoided(NaiveDate),
    Sweep(LiveDecision),
    TradeResolved {
        event: SweepEvent,
        outcome: TradeOutcome,
    },
}

#[derive(Debug)]
struct OpenTrade {
    event: SweepEvent,
    sim: TradeSimulator,
}

/// Poll-driven state for one instrument.
///
/// Every `poll` receives a full refreshed snapshot and walks only the candles
/// not seen before. The first poll starts at the first candle of the latest
/// day in the snapshot.
#[derive(Debug)]
pub struct LiveSession {
    config: EngineConfig,
    day: Option<NaiveDate>,
    phase: LivePhase,
    tracker: RangeTracker,
    detector: SweepDetector,
    open_trades: Vec<OpenTrade>,
    last_seen: Option<NaiveDateTime>,
}

impl LiveSession {
    pub fn new(config: EngineConfig) -> Self {
        let detector = SweepDetector::new(config.void_on_outside_close);
        Self {
            config,
            day: None,
            phase: LivePhase::AwaitingRange,
            tracker: RangeTracker::new(),
            detector,
            open_trades: Vec::new(),
            last_seen: None,
        }
    }

    pub fn phase(&self) -> &LivePhase {
        &self.phase
    }

    pub fn day(&self) -> Option<NaiveDate> {
        self.day
    }

    pub fn last_seen(&self) -> Option<NaiveDateTime> {
        self.last_seen
    }

    pub fn open_trades(&self) -> usize {
        self.open_trades.len()
    }

    pub fn poll(&mut self, candles: &[Candle]) -> Result<Vec<LiveUpdate>, AppError> {
        validate_candles(candles)?;
        let Some(last) = candles.last() else {
            return Ok(Vec::new());
        };

        let start = match self.last_seen {
            Some(seen) if last.timestamp <= seen => {
                debug!(latest = %last.timestamp, %seen, "snapshot has nothing new");
                return Ok(Vec::new());
            }
            Some(seen) => candles.partition_point(|c| c.timestamp <= seen),
            None => {
                let today = last.date();
                candles.partition_point(|c| c.date() < today)
            }
        };

        let mut updates = Vec::new();
        for i in start..candles.len() {
            let candle = &candles[i];
            self.step_open_trades(candle, &mut updates);
            self.roll_day(candle.date());

            if let Some(range) = self.tracker.push(i, candle) {
                if self.phase == LivePhase::AwaitingRange && range.day == candle.date() {
                    info!(day = %range.day, high = range.high, low = range.low, "asian range ready");
                    self.phase = LivePhase::Watching(range.clone());
                }
                updates.push(LiveUpdate::RangeReady(range));
            }

            if let LivePhase::Watching(range) = &self.phase {
                match self.detector.inspect(i, candle, range) {
                    SweepScan::Voided => {
                        info!(day = %range.day, at = %candle.timestamp, "day voided");
                        updates.push(LiveUpdate::DayVoided(range.day));
                        self.phase = LivePhase::Voided;
                    }
                    SweepScan::Sweep(event) => {
                        let decision = self.decide(candles, event);
                        info!(
                            day = %decision.event.day,
                            direction = %decision.direction,
                            entry = decision.entry_price,
                            stop = decision.stop_price,
                            "sweep signal"
                        );
                        self.open_trades.push(OpenTrade {
                            sim: TradeSimulator::new(&decision.event, self.config.lookahead),
                            event: decision.event.clone(),
                        });
                        updates.push(LiveUpdate::Sweep(decision));
                        self.phase = LivePhase::Signalled;
                    }
                    _ => {}
                }
            }
            self.last_seen = Some(candle.timestamp);
        }
        Ok(updates)
    }

    fn step_open_trades(&mut self, candle: &Candle, updates: &mut Vec<LiveUpdate>) {
        for trade in self.open_trades.iter_mut() {
            trade.sim.step(candle);
        }
        let (finished, open): (Vec<_>, Vec<_>) = self
            .open_trades
            .drain(..)
            .partition(|t| t.sim.is_finished());
        self.open_trades = open;
        for trade in finished {
            let outcome = trade.sim.outcome();
            info!(day = %trade.event.day, outcome = %outcome.label(), "trade resolved");
            updates.push(LiveUpdate::TradeResolved {
                event: trade.event,
                outcome,
            });
        }
    }

    fn roll_day(&mut self, date: NaiveDate) {
        if self.day == Some(date) {
            return;
        }
        debug!(day = %date, "new trading day");
        self.day = Some(date);
        self.phase = LivePhase::AwaitingRange;
        self.tracker.reset();
        self.detector.reset();
    }

    /// Features for a sweep from what the snapshot holds up to and including
    /// the trigger candle.
    fn decide(&self, candles: &[Candle], event: SweepEvent) -> LiveDecision {
        let known = &candles[..=event.position];
        let indicators =
            IndicatorSet::compute(known, &self.config.indicators).snapshot(event.position);
        // Earlier trades keep resolving into today, as in the batch table.
        let prior = FeatureExtractor::new(self.config.clone())
            .scan(known)
            .prior_for(event.day);
        let pending = TradeSimulator::new(&event, self.config.lookahead).outcome();
        let mut row = build_row(&event, &pending, indicators, prior);
        row.london_vol = round_to(london_extent(known, event.day), PRICE_DECIMALS);
        LiveDecision {
            direction: event.direction,
            entry_price: event.entry_price,
            stop_price: event.stop_price,
            features: row.feature_vector(),
            event,
        }
    }
}

/// High minus low over the London candles of `day`.
fn london_extent(candles: &[Candle], day: NaiveDate) -> f64 {
    let (high, low) = candles
        .iter()
        .filter(|c| c.session == Session::London && c.date() == day)
        .fold((f64::MIN, f64::MAX), |(h, l), c| (h.max(c.high), l.min(c.low)));
    if high < low {
        0.0
    } else {
        high - low
    }
}
