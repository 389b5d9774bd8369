pub mod telegram;

use anyhow::Result;

use crate::live::session::LiveDecision;
use crate::model::candle::Candle;

pub use telegram::TelegramNotifier;

/// Outbound channel for signals.
pub trait Notifier {
    fn send_message(&self, text: &str) -> Result<()>;
    fn send_photo(&self, image: &[u8]) -> Result<()>;
}

/// Draws the snapshot around a decision into an encoded image.
pub trait ChartRenderer {
    fn render(&self, candles: &[Candle], decision: &LiveDecision) -> Result<Vec<u8>>;
}
