mod common;

use std::collections::BTreeSet;

use asia_sweep::config::EngineConfig;
use asia_sweep::error::AppError;
use asia_sweep::features::FeatureExtractor;
use asia_sweep::model::signal::Direction;
use asia_sweep::model::trade::OutcomeLabel;
use asia_sweep::session::Session;

use common::{at, date, overnight_resolution, ts, week, Tape, DRIFT, LONG_SWEEP, SHORT_SWEEP};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn one_row_per_traded_day() {
    let rows = FeatureExtractor::new(EngineConfig::default())
        .extract(&week())
        .unwrap();
    let days: Vec<_> = rows.iter().map(|r| r.day()).collect();
    assert_eq!(
        days,
        vec![date("2024-05-06"), date("2024-05-07"), date("2024-05-09")]
    );
    let unique: BTreeSet<_> = days.iter().collect();
    assert_eq!(unique.len(), days.len());
}

#[test]
fn row_fields_for_first_day() {
    let rows = FeatureExtractor::new(EngineConfig::default())
        .extract(&week())
        .unwrap();
    let row = &rows[0];
    assert_eq!(row.index, 10);
    assert_eq!(row.date, ts("2024-05-06 10:00"));
    assert_eq!(row.asian_high, 1.1040);
    assert_eq!(row.asian_low, 1.1010);
    assert_eq!(row.session, Session::London);
    assert_eq!(row.trade_direction, Direction::Short);
    assert_eq!(row.entry_price, 1.1030);
    assert_eq!(row.stop_price, 1.1060);
    assert_eq!((row.tp1_hit, row.tp2_hit, row.sl_hit, row.be_hit), (1, 1, 0, 0));
    assert_eq!(row.outcome, OutcomeLabel::TakeProfit2);
    assert_eq!(row.rr_tp2, Some(0.67));
    assert_eq!(row.day_type, "Monday");
    assert!(close(row.asia_vol, 0.003));
    assert!(close(row.london_vol, 0.005));
    // Warmup not reached at index 10.
    assert_eq!(row.atr14, None);
    assert_eq!(row.ema20, None);
    assert_eq!(row.macd, None);
    assert_eq!(row.prev_traded, 0);
    assert_eq!(row.prev_result, None);
    assert_eq!(row.prev_direction, None);
}

#[test]
fn prior_day_memory_feeds_next_row() {
    let rows = FeatureExtractor::new(EngineConfig::default())
        .extract(&week())
        .unwrap();
    let tuesday = &rows[1];
    assert_eq!(tuesday.trade_direction, Direction::Long);
    assert_eq!(tuesday.outcome, OutcomeLabel::TakeProfit2);
    assert_eq!(tuesday.prev_traded, 1);
    // Any trade that reached TP1 is remembered as TP1.
    assert_eq!(tuesday.prev_result, Some(OutcomeLabel::TakeProfit1));
    assert_eq!(tuesday.prev_direction, Some(Direction::Short));
    assert!(tuesday.atr14.is_some());
    assert!(tuesday.ema20.is_some());
    assert!(tuesday.rsi14.is_some());
    assert!(tuesday.macd.is_some());

    // Wednesday had no trade, so Thursday starts fresh.
    let thursday = &rows[2];
    assert_eq!(thursday.day_type, "Thursday");
    assert_eq!(thursday.prev_traded, 0);
    assert_eq!(thursday.outcome, OutcomeLabel::StopLoss);
    assert_eq!((thursday.tp1_hit, thursday.sl_hit), (0, 1));
}

#[test]
fn void_rule_follows_config() {
    let mut config = EngineConfig::default();
    config.void_on_outside_close = false;
    let rows = FeatureExtractor::new(config).extract(&week()).unwrap();
    assert_eq!(rows.len(), 4);
    let friday = &rows[3];
    assert_eq!(friday.date, ts("2024-05-10 11:00"));
    assert_eq!(friday.prev_result, Some(OutcomeLabel::StopLoss));
    assert_eq!(friday.prev_direction, Some(Direction::Short));
}

#[test]
fn assembler_memory_is_exposed() {
    let assembler = FeatureExtractor::new(EngineConfig::default())
        .run(&week())
        .unwrap();
    let prior = assembler.prior_for(date("2024-05-10")).unwrap();
    assert_eq!(prior.label, OutcomeLabel::StopLoss);
    assert!(assembler.prior_for(date("2024-05-09")).is_none());
    assert_eq!(assembler.len(), 3);
}

#[test]
fn unresolved_trade_is_remembered_as_breakeven() {
    let monday: Vec<_> = std::iter::once(at(10, SHORT_SWEEP))
        .chain((11..24).map(|h| at(h, DRIFT)))
        .collect();
    let candles = Tape::new()
        .day("2024-05-06", &monday)
        .day("2024-05-07", &[at(10, LONG_SWEEP)])
        .build();
    let config = EngineConfig {
        lookahead: 5,
        ..EngineConfig::default()
    };
    let rows = FeatureExtractor::new(config).extract(&candles).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].outcome, OutcomeLabel::Open);
    assert_eq!(rows[1].prev_result, Some(OutcomeLabel::Breakeven));
    assert_eq!(rows[1].prev_direction, Some(Direction::Short));
}

#[test]
fn stopped_trade_is_remembered_as_stop_loss() {
    let rows = FeatureExtractor::new(EngineConfig {
        void_on_outside_close: false,
        ..EngineConfig::default()
    })
    .extract(&week())
    .unwrap();
    let labels: Vec<_> = rows.iter().map(|r| r.prev_result).collect();
    assert_eq!(
        labels,
        vec![
            None,
            Some(OutcomeLabel::TakeProfit1),
            None,
            Some(OutcomeLabel::StopLoss)
        ]
    );
}

#[test]
fn overnight_trade_resolves_before_next_row() {
    let rows = FeatureExtractor::new(EngineConfig::default())
        .extract(&overnight_resolution())
        .unwrap();
    assert_eq!(rows[0].outcome, OutcomeLabel::TakeProfit2);
    assert_eq!(rows[1].prev_result, Some(OutcomeLabel::TakeProfit1));
}

#[test]
fn sweep_on_last_candle_is_kept_as_open() {
    let mut candles = Tape::new()
        .day("2024-05-06", &[at(10, SHORT_SWEEP)])
        .build();
    candles.truncate(11);
    let rows = FeatureExtractor::new(EngineConfig::default())
        .extract(&candles)
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].outcome, OutcomeLabel::Open);
    assert_eq!((rows[0].tp1_hit, rows[0].tp2_hit, rows[0].sl_hit, rows[0].be_hit), (0, 0, 0, 0));
    assert!(close(rows[0].london_vol, 0.004));
}

#[test]
fn empty_input_yields_no_rows() {
    let rows = FeatureExtractor::new(EngineConfig::default())
        .extract(&[])
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn out_of_order_candles_are_rejected() {
    let mut candles = week();
    candles.swap(3, 4);
    let err = FeatureExtractor::new(EngineConfig::default())
        .extract(&candles)
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[test]
fn non_finite_prices_are_rejected() {
    let mut candles = week();
    candles[5].close = f64::NAN;
    assert!(FeatureExtractor::new(EngineConfig::default())
        .extract(&candles)
        .is_err());
}
