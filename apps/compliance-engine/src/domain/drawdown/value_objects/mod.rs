//! Drawdown value objects.

mod audit;
mod drawdown_input;
mod drawdown_result;

pub use audit::{DailyDrawdownRecord, DrawdownAudit};
pub use drawdown_input::DrawdownInput;
pub use drawdown_result::DrawdownResult;
