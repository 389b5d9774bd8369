//! Probability scoring of a sweep decision.
//!
//! The shipped adapter evaluates a standardised logistic model exported to
//! JSON by the training pipeline:
//!
//! ```json
//! {
//!   "columns": ["asian_high", "session", "..."],
//!   "label_maps": { "session": { "London": 0, "New-York": 1 } },
//!   "means": [1.1, 0.0],
//!   "scales": [0.01, 1.0],
//!   "weights": [0.4, -0.2],
//!   "bias": 0.1
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::AppError;
use crate::model::feature::{FeatureValue, FeatureVector};

/// Encoding used for a category the model never saw.
pub const UNKNOWN_CATEGORY: f64 = -1.0;

pub trait SignalScorer {
    /// Probability in `[0, 1]` that the trade reaches its first target.
    fn score(&self, features: &FeatureVector) -> Result<f64>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogisticScorer {
    columns: Vec<String>,
    #[serde(default)]
    label_maps: HashMap<String, HashMap<String, i64>>,
    means: Vec<f64>,
    scales: Vec<f64>,
    weights: Vec<f64>,
    bias: f64,
}

impl LogisticScorer {
    pub fn from_json(s: &str) -> Result<Self, AppError> {
        let scorer: LogisticScorer = serde_json::from_str(s)?;
        scorer.validate()?;
        Ok(scorer)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read model {}", path.display()))?;
        let scorer = Self::from_json(&body)
            .with_context(|| format!("failed to parse model {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            columns = scorer.columns.len(),
            "Model loaded"
        );
        Ok(scorer)
    }

    fn validate(&self) -> Result<(), AppError> {
        let n = self.columns.len();
        if n == 0 {
            return Err(AppError::Model("model has no columns".to_string()));
        }
        for (name, len) in [
            ("means", self.means.len()),
            ("scales", self.scales.len()),
            ("weights", self.weights.len()),
        ] {
            if len != n {
                return Err(AppError::Model(format!(
                    "{} has {} entries, expected {}",
                    name, len, n
                )));
            }
        }
        Ok(())
    }

    /// Model input for one column, categories encoded through the label maps.
    fn encode(&self, column: &str, features: &FeatureVector) -> Result<f64, AppError> {
        match features.get(column) {
            None => Err(AppError::Model(format!("feature '{}' is missing", column))),
            Some(FeatureValue::Number(Some(v))) => Ok(*v),
            Some(FeatureValue::Number(None)) => Err(AppError::Model(format!(
                "feature '{}' is unavailable",
                column
            ))),
            Some(FeatureValue::Category(label)) => {
                let map = self.label_maps.get(column).ok_or_else(|| {
                    AppError::Model(format!("no label map for categorical '{}'", column))
                })?;
                Ok(match map.get(label) {
                    Some(code) => *code as f64,
                    None => {
                        tracing::warn!(column, label = %label, "unseen category");
                        UNKNOWN_CATEGORY
                    }
                })
            }
        }
    }
}

impl SignalScorer for LogisticScorer {
    fn score(&self, features: &FeatureVector) -> Result<f64> {
        let mut logit = self.bias;
        for (i, column) in self.columns.iter().enumerate() {
            let x = self.encode(column, features)?;
            let scale = if self.scales[i] == 0.0 {
                1.0
            } else {
                self.scales[i]
            };
            logit += self.weights[i] * (x - self.means[i]) / scale;
        }
        Ok(sigmoid(logit))
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
