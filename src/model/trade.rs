use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::candle::Candle;
use super::range::SessionRange;
use super::signal::Direction;

/// First London candle that pierced the Asian range and closed back inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepEvent {
    pub day: NaiveDate,
    /// Position of the trigger candle in the scanned series.
    pub position: usize,
    pub trigger: Candle,
    pub direction: Direction,
    pub entry_price: f64,
    pub stop_price: f64,
    pub range: SessionRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeState {
    Open,
    BreakevenArmed,
    StopLoss,
    Breakeven,
    TakeProfit2,
    Undetermined,
}

impl TradeState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TradeState::StopLoss
                | TradeState::Breakeven
                | TradeState::TakeProfit2
                | TradeState::Undetermined
        )
    }
}

/// Short result label kept in the prior-day memory and written to rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeLabel {
    #[serde(rename = "TP2")]
    TakeProfit2,
    #[serde(rename = "TP1")]
    TakeProfit1,
    #[serde(rename = "BE")]
    Breakeven,
    #[serde(rename = "SL")]
    StopLoss,
    #[serde(rename = "OPEN")]
    Open,
}

impl OutcomeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeLabel::TakeProfit2 => "TP2",
            OutcomeLabel::TakeProfit1 => "TP1",
            OutcomeLabel::Breakeven => "BE",
            OutcomeLabel::StopLoss => "SL",
            OutcomeLabel::Open => "OPEN",
        }
    }
}

impl fmt::Display for OutcomeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Take-profit levels derived from the swept range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Targets {
    pub tp1: f64,
    pub tp2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeOutcome {
    pub state: TradeState,
    pub tp1_hit: bool,
    pub tp2_hit: bool,
    pub sl_hit: bool,
    pub be_hit: bool,
    pub rr_tp1: Option<f64>,
    pub rr_tp2: Option<f64>,
    pub post_sweep_high: f64,
    pub post_sweep_low: f64,
    /// Forward candles consumed before the trade resolved.
    pub candles_examined: usize,
}

impl TradeOutcome {
    pub fn label(&self) -> OutcomeLabel {
        match self.state {
            TradeState::TakeProfit2 => OutcomeLabel::TakeProfit2,
            TradeState::Breakeven => OutcomeLabel::Breakeven,
            TradeState::StopLoss => OutcomeLabel::StopLoss,
            _ if self.tp1_hit => OutcomeLabel::TakeProfit1,
            _ => OutcomeLabel::Open,
        }
    }

    /// Coarser label remembered for the next day's row. A trade that reached
    /// TP1 is `TP1` whatever followed; one that never did is `SL` or `BE`.
    pub fn prior_label(&self) -> OutcomeLabel {
        if self.tp1_hit {
            OutcomeLabel::TakeProfit1
        } else if self.sl_hit {
            OutcomeLabel::StopLoss
        } else {
            OutcomeLabel::Breakeven
        }
    }

    pub fn post_sweep_volatility(&self) -> f64 {
        self.post_sweep_high - self.post_sweep_low
    }
}
