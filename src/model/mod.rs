pub mod candle;
pub mod feature;
pub mod range;
pub mod signal;
pub mod trade;

pub use candle::{validate_candles, Candle};
pub use feature::{FeatureRow, FeatureValue, FeatureVector, PriorOutcome};
pub use range::SessionRange;
pub use signal::Direction;
pub use trade::{OutcomeLabel, SweepEvent, Targets, TradeOutcome, TradeState};
