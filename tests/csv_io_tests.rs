mod common;

use asia_sweep::config::EngineConfig;
use asia_sweep::features::FeatureExtractor;
use asia_sweep::io::{parse_timestamp, read_candles, rows_to_csv_string};
use asia_sweep::model::feature::FeatureValue;
use asia_sweep::session::Session;

use common::{ts, week};

const PRICES: &str = "\
Date,Open,High,Low,Close,Volume,Index,Session
2024-05-06 02:00:00+00:00,1.1025,1.1040,1.1010,1.1025,120,0,Asia
2024-05-06 03:00:00+00:00,1.1025,1.1040,1.1010,1.1030,80,1,Asia
2024-05-06 15:00:00+00:00,1.1030,1.1050,1.1020,1.1045,95,2,New-York
";

#[test]
fn reads_collector_price_file() {
    let candles = read_candles(PRICES.as_bytes()).unwrap();
    assert_eq!(candles.len(), 3);
    assert_eq!(candles[0].timestamp, ts("2024-05-06 02:00"));
    assert_eq!(candles[1].close, 1.1030);
    assert_eq!(candles[1].volume, 80.0);
    assert_eq!(candles[2].index, 2);
    assert_eq!(candles[2].session, Session::NewYork);
}

#[test]
fn missing_session_column_is_classified() {
    let csv = "\
Date,Open,High,Low,Close
2024-01-15 10:00,1.1,1.2,1.0,1.1
2024-05-06 10:00,1.1,1.2,1.0,1.1
";
    let candles = read_candles(csv.as_bytes()).unwrap();
    assert_eq!(candles[0].session, Session::Frankfurt);
    assert_eq!(candles[1].session, Session::London);
    assert_eq!(candles[1].index, 1);
    assert_eq!(candles[1].volume, 0.0);
}

#[test]
fn rejects_bad_rows() {
    let bad_date = "Date,Open,High,Low,Close\nyesterday,1,1,1,1\n";
    assert!(read_candles(bad_date.as_bytes()).is_err());

    let bad_session = "Date,Open,High,Low,Close,Session\n2024-05-06 10:00,1,1,1,1,Sydney\n";
    assert!(read_candles(bad_session.as_bytes()).is_err());

    let unordered = "\
Date,Open,High,Low,Close
2024-05-06 11:00,1,1,1,1
2024-05-06 10:00,1,1,1,1
";
    assert!(read_candles(unordered.as_bytes()).is_err());
}

#[test]
fn timestamp_formats() {
    let expected = ts("2024-05-06 10:30");
    for raw in [
        "2024-05-06 10:30:00+00:00",
        "2024-05-06T10:30:00+03:00",
        "2024-05-06T10:30:00",
        "2024-05-06 10:30:00",
        "2024-05-06 10:30",
    ] {
        assert_eq!(parse_timestamp(raw).unwrap(), expected, "{}", raw);
    }
}

#[test]
fn feature_table_header_and_cells() {
    let rows = FeatureExtractor::new(EngineConfig::default())
        .extract(&week())
        .unwrap();
    let out = rows_to_csv_string(&rows).unwrap();
    let mut lines = out.lines();
    assert_eq!(
        lines.next().unwrap(),
        "index,date,asian_high,asian_low,session,trade_direction,entry_price,stop_price,\
tp1_hit,tp2_hit,sl_hit,be_hit,outcome,rr_tp1,rr_tp2,atr14,ema20,rsi14,macd,\
prev_result,prev_direction,prev_traded,day_type,asia_vol,london_vol"
    );

    let first: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert_eq!(first.len(), 25);
    assert_eq!(first[0], "10");
    assert_eq!(first[1], "2024-05-06T10:00:00");
    assert_eq!(first[4], "London");
    assert_eq!(first[5], "Short");
    assert_eq!(first[12], "TP2");
    // Indicators before warmup are empty cells; a missing prior day is the
    // "None" category.
    assert_eq!(first[15], "");
    assert_eq!(first[18], "");
    assert_eq!(first[19], "None");
    assert_eq!(first[20], "None");
    assert_eq!(
        rows[0].feature_vector().get("prev_result"),
        Some(&FeatureValue::Category(first[19].to_string()))
    );
    assert_eq!(first[21], "0");
    assert_eq!(first[22], "Monday");

    let second: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert_eq!(second[19], "TP1");
    assert_eq!(second[20], "Short");
    assert_eq!(second[21], "1");
    assert!(!second[15].is_empty());
    assert_eq!(out.lines().count(), 1 + rows.len());
}
