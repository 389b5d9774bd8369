use crate::indicator::{round_to, PERCENT_DECIMALS};
use crate::model::candle::Candle;
use crate::model::range::SessionRange;
use crate::model::signal::Direction;
use crate::model::trade::{SweepEvent, Targets, TradeOutcome, TradeState};

/// TP1 at the range midpoint, TP2 at the boundary opposite the stop.
pub fn targets(range: &SessionRange, direction: Direction) -> Targets {
    let tp2 = match direction {
        Direction::Short => range.low,
        Direction::Long => range.high,
    };
    Targets {
        tp1: range.midpoint(),
        tp2,
    }
}

/// Reward over risk toward `target`, positive when the target lies on the
/// profitable side. `None` when entry equals stop.
pub fn reward_to_risk(direction: Direction, entry: f64, stop: f64, target: f64) -> Option<f64> {
    let (reward, risk) = match direction {
        Direction::Long => (target - entry, entry - stop),
        Direction::Short => (entry - target, stop - entry),
    };
    if risk == 0.0 {
        return None;
    }
    Some(round_to(reward / risk, PERCENT_DECIMALS))
}

/// Forward state machine for one sweep trade.
///
/// Each `step` checks the stop active at the start of the candle first, then
/// TP1 promotion, then TP2.
#[derive(Debug, Clone)]
pub struct TradeSimulator {
    direction: Direction,
    entry: f64,
    active_stop: f64,
    targets: Targets,
    horizon: usize,
    state: TradeState,
    tp1_hit: bool,
    post_sweep_high: f64,
    post_sweep_low: f64,
    examined: usize,
    rr_tp1: Option<f64>,
    rr_tp2: Option<f64>,
}

impl TradeSimulator {
    pub fn new(event: &SweepEvent, horizon: usize) -> Self {
        let targets = targets(&event.range, event.direction);
        Self {
            direction: event.direction,
            entry: event.entry_price,
            active_stop: event.stop_price,
            targets,
            horizon,
            state: TradeState::Open,
            tp1_hit: false,
            post_sweep_high: event.trigger.high,
            post_sweep_low: event.trigger.low,
            examined: 0,
            rr_tp1: reward_to_risk(event.direction, event.entry_price, event.stop_price, targets.tp1),
            rr_tp2: reward_to_risk(event.direction, event.entry_price, event.stop_price, targets.tp2),
        }
    }

    pub fn state(&self) -> TradeState {
        self.state
    }

    pub fn active_stop(&self) -> f64 {
        self.active_stop
    }

    /// Finished once terminal or once the horizon is used up.
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal() || self.examined >= self.horizon
    }

    /// Advance by one forward candle. Candles past the end are ignored.
    pub fn step(&mut self, candle: &Candle) -> TradeState {
        if self.is_finished() {
            return self.state;
        }
        self.examined += 1;
        self.post_sweep_high = self.post_sweep_high.max(candle.high);
        self.post_sweep_low = self.post_sweep_low.min(candle.low);

        if self.stop_reached(candle) {
            self.state = match self.state {
                TradeState::BreakevenArmed => TradeState::Breakeven,
                _ => TradeState::StopLoss,
            };
            return self.state;
        }

        if self.state == TradeState::Open && self.reached(candle, self.targets.tp1) {
            self.state = TradeState::BreakevenArmed;
            self.tp1_hit = true;
            self.active_stop = self.entry;
        }

        if self.reached(candle, self.targets.tp2) {
            self.state = TradeState::TakeProfit2;
        }
        self.state
    }

    fn stop_reached(&self, candle: &Candle) -> bool {
        match self.direction {
            Direction::Short => candle.high >= self.active_stop,
            Direction::Long => candle.low <= self.active_stop,
        }
    }

    fn reached(&self, candle: &Candle, target: f64) -> bool {
        match self.direction {
            Direction::Short => candle.low <= target,
            Direction::Long => candle.high >= target,
        }
    }

    /// Snapshot of the trade. A trade still open is reported as
    /// `Undetermined`.
    pub fn outcome(&self) -> TradeOutcome {
        let state = if self.state.is_terminal() {
            self.state
        } else {
            TradeState::Undetermined
        };
        TradeOutcome {
            state,
            tp1_hit: self.tp1_hit,
            tp2_hit: state == TradeState::TakeProfit2,
            sl_hit: state == TradeState::StopLoss,
            be_hit: state == TradeState::Breakeven,
            rr_tp1: self.rr_tp1,
            rr_tp2: self.rr_tp2,
            post_sweep_high: self.post_sweep_high,
            post_sweep_low: self.post_sweep_low,
            candles_examined: self.examined,
        }
    }

    /// Run the trade over `forward` until it resolves or `horizon` candles
    /// have been examined.
    pub fn run(event: &SweepEvent, forward: &[Candle], horizon: usize) -> TradeOutcome {
        let mut sim = Self::new(event, horizon);
        for candle in forward {
            if sim.is_finished() {
                break;
            }
            sim.step(candle);
        }
        sim.outcome()
    }
}
