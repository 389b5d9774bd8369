pub mod range_tracker;
pub mod sweep_detector;
pub mod trade_simulator;

pub use range_tracker::RangeTracker;
pub use sweep_detector::{detect_sweep, SweepDetector, SweepScan};
pub use trade_simulator::{reward_to_risk, targets, TradeSimulator};
