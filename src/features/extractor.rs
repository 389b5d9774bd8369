use tracing::{debug, info};

use super::assembler::FeatureAssembler;
use crate::config::EngineConfig;
use crate::error::AppError;
use crate::indicator::IndicatorSet;
use crate::model::candle::{validate_candles, Candle};
use crate::model::feature::FeatureRow;
use crate::session::Session;
use crate::strategy::range_tracker::RangeTracker;
use crate::strategy::sweep_detector::{SweepDetector, SweepScan};
use crate::strategy::trade_simulator::TradeSimulator;

/// Batch path: one pass over a historical candle sequence producing one
/// feature row per traded day.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    config: EngineConfig,
}

impl FeatureExtractor {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn extract(&self, candles: &[Candle]) -> Result<Vec<FeatureRow>, AppError> {
        Ok(self.run(candles)?.into_rows())
    }

    /// Like [`extract`](Self::extract) but keeps the assembler so callers can
    /// read the per-day outcome memory.
    pub fn run(&self, candles: &[Candle]) -> Result<FeatureAssembler, AppError> {
        validate_candles(candles)?;
        Ok(self.scan(candles))
    }

    /// Single pass over candles that already passed `validate_candles`.
    pub(crate) fn scan(&self, candles: &[Candle]) -> FeatureAssembler {
        let indicators = IndicatorSet::compute(candles, &self.config.indicators);
        let mut tracker = RangeTracker::new();
        let mut detector = SweepDetector::new(self.config.void_on_outside_close);
        let mut assembler = FeatureAssembler::new();
        let mut voided = 0usize;

        for (i, candle) in candles.iter().enumerate() {
            tracker.push(i, candle);
            if candle.session != Session::London {
                continue;
            }
            let Some(range) = tracker.range_for(candle.date()) else {
                continue;
            };
            match detector.inspect(i, candle, range) {
                SweepScan::Sweep(event) => {
                    let outcome =
                        TradeSimulator::run(&event, &candles[i + 1..], self.config.lookahead);
                    debug!(
                        day = %event.day,
                        outcome = %outcome.label(),
                        examined = outcome.candles_examined,
                        "sweep resolved"
                    );
                    assembler.append(&event, &outcome, indicators.snapshot(i));
                }
                SweepScan::Voided => voided += 1,
                _ => {}
            }
        }

        info!(
            candles = candles.len(),
            ranges = tracker.ranges().len(),
            rows = assembler.len(),
            voided,
            "feature extraction finished"
        );
        assembler
    }
}
