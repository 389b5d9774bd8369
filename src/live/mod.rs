pub mod driver;
pub mod session;
pub mod trader;

pub use driver::{run_live, PollSummary};
pub use session::{LiveDecision, LivePhase, LiveSession, LiveUpdate};
pub use trader::{signal_message, LiveTrader, TraderEvent};
