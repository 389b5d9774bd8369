use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::indicator::{round_to, IndicatorSnapshot, PRICE_DECIMALS};
use crate::model::feature::{FeatureRow, PriorOutcome};
use crate::model::trade::{SweepEvent, TradeOutcome};

/// Combine one resolved sweep into a training row.
pub fn build_row(
    event: &SweepEvent,
    outcome: &TradeOutcome,
    indicators: IndicatorSnapshot,
    prior: Option<PriorOutcome>,
) -> FeatureRow {
    let trigger = &event.trigger;
    FeatureRow {
        index: trigger.index,
        date: trigger.timestamp,
        asian_high: event.range.high,
        asian_low: event.range.low,
        session: trigger.session,
        trade_direction: event.direction,
        entry_price: event.entry_price,
        stop_price: event.stop_price,
        tp1_hit: u8::from(outcome.tp1_hit),
        tp2_hit: u8::from(outcome.tp2_hit),
        sl_hit: u8::from(outcome.sl_hit),
        be_hit: u8::from(outcome.be_hit),
        outcome: outcome.label(),
        rr_tp1: outcome.rr_tp1,
        rr_tp2: outcome.rr_tp2,
        atr14: indicators.atr,
        ema20: indicators.ema,
        rsi14: indicators.rsi,
        macd: indicators.macd,
        prev_result: prior.map(|p| p.label),
        prev_direction: prior.map(|p| p.direction),
        prev_traded: u8::from(prior.is_some()),
        day_type: trigger.timestamp.format("%A").to_string(),
        asia_vol: round_to(event.range.volatility(), PRICE_DECIMALS),
        london_vol: round_to(outcome.post_sweep_volatility(), PRICE_DECIMALS),
    }
}

/// Append-only row sequence with the per-day outcome memory the next day's
/// row reads from.
#[derive(Debug, Default)]
pub struct FeatureAssembler {
    rows: Vec<FeatureRow>,
    memory: BTreeMap<NaiveDate, PriorOutcome>,
}

impl FeatureAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcome recorded for the calendar day before `day`.
    pub fn prior_for(&self, day: NaiveDate) -> Option<PriorOutcome> {
        day.pred_opt()
            .and_then(|prev| self.memory.get(&prev))
            .copied()
    }

    /// Add the row for a resolved sweep. Returns `None` and leaves the
    /// sequence untouched when the day already has a row.
    pub fn append(
        &mut self,
        event: &SweepEvent,
        outcome: &TradeOutcome,
        indicators: IndicatorSnapshot,
    ) -> Option<&FeatureRow> {
        if self.memory.contains_key(&event.day) {
            warn!(day = %event.day, "feature row for this day already exists, skipping");
            return None;
        }
        let row = build_row(event, outcome, indicators, self.prior_for(event.day));
        self.memory.insert(
            event.day,
            PriorOutcome {
                label: outcome.prior_label(),
                direction: row.trade_direction,
            },
        );
        self.rows.push(row);
        self.rows.last()
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<FeatureRow> {
        self.rows
    }
}
