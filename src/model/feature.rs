use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::signal::Direction;
use super::trade::OutcomeLabel;
use crate::session::Session;

/// What happened on a traded day, as remembered for the following day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorOutcome {
    pub label: OutcomeLabel,
    pub direction: Direction,
}

/// Category written for the prior-day columns when the previous day had no
/// trade.
pub const NO_PRIOR: &str = "None";

/// One training record per traded day.
///
/// Field order is the column order of the exported table. Indicator and R:R
/// fields are `None` when the value was unavailable and serialize as empty
/// cells. A missing prior day is written as [`NO_PRIOR`], the same category
/// the model sees live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub index: usize,
    pub date: NaiveDateTime,
    pub asian_high: f64,
    pub asian_low: f64,
    pub session: Session,
    pub trade_direction: Direction,
    pub entry_price: f64,
    pub stop_price: f64,
    pub tp1_hit: u8,
    pub tp2_hit: u8,
    pub sl_hit: u8,
    pub be_hit: u8,
    pub outcome: OutcomeLabel,
    pub rr_tp1: Option<f64>,
    pub rr_tp2: Option<f64>,
    pub atr14: Option<f64>,
    pub ema20: Option<f64>,
    pub rsi14: Option<f64>,
    pub macd: Option<f64>,
    #[serde(with = "prior_cell")]
    pub prev_result: Option<OutcomeLabel>,
    #[serde(with = "prior_cell")]
    pub prev_direction: Option<Direction>,
    pub prev_traded: u8,
    pub day_type: String,
    pub asia_vol: f64,
    pub london_vol: f64,
}

impl FeatureRow {
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    /// Model inputs of this row, outcome columns excluded.
    pub fn feature_vector(&self) -> FeatureVector {
        FeatureVector::from_columns(vec![
            ("asian_high", FeatureValue::number(self.asian_high)),
            ("asian_low", FeatureValue::number(self.asian_low)),
            ("session", FeatureValue::category(self.session.as_str())),
            (
                "trade_direction",
                FeatureValue::category(self.trade_direction.as_str()),
            ),
            ("entry_price", FeatureValue::number(self.entry_price)),
            ("rr_tp1", FeatureValue::Number(self.rr_tp1)),
            ("rr_tp2", FeatureValue::Number(self.rr_tp2)),
            ("atr14", FeatureValue::Number(self.atr14)),
            ("ema20", FeatureValue::Number(self.ema20)),
            ("rsi14", FeatureValue::Number(self.rsi14)),
            ("macd", FeatureValue::Number(self.macd)),
            (
                "prev_result",
                FeatureValue::category(self.prev_result.map(|l| l.as_str()).unwrap_or(NO_PRIOR)),
            ),
            (
                "prev_direction",
                FeatureValue::category(
                    self.prev_direction.map(|d| d.as_str()).unwrap_or(NO_PRIOR),
                ),
            ),
            ("prev_traded", FeatureValue::number(f64::from(self.prev_traded))),
            ("day_type", FeatureValue::category(&self.day_type)),
            ("asia_vol", FeatureValue::number(self.asia_vol)),
            ("london_vol", FeatureValue::number(self.london_vol)),
        ])
    }
}

/// Serde adapter mapping `None` to the [`NO_PRIOR`] category.
mod prior_cell {
    use serde::de::{DeserializeOwned, IntoDeserializer};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::NO_PRIOR;

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(v) => v.serialize(serializer),
            None => serializer.serialize_str(NO_PRIOR),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: DeserializeOwned,
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw == NO_PRIOR {
            return Ok(None);
        }
        T::deserialize(raw.into_deserializer()).map(Some)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Number(Option<f64>),
    Category(String),
}

impl FeatureValue {
    pub fn number(v: f64) -> Self {
        FeatureValue::Number(Some(v))
    }

    pub fn category(s: &str) -> Self {
        FeatureValue::Category(s.to_string())
    }
}

/// Named model inputs in a fixed column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    columns: Vec<(&'static str, FeatureValue)>,
}

impl FeatureVector {
    pub fn from_columns(columns: Vec<(&'static str, FeatureValue)>) -> Self {
        Self { columns }
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.columns
            .iter()
            .find(|(col, _)| *col == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FeatureValue)> {
        self.columns.iter().map(|(name, v)| (*name, v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns whose numeric value is unavailable.
    pub fn missing(&self) -> Vec<&'static str> {
        self.columns
            .iter()
            .filter(|(_, v)| matches!(v, FeatureValue::Number(None)))
            .map(|(name, _)| *name)
            .collect()
    }
}
