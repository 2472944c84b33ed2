//! Payout services.

mod payout_calculator;
mod payout_settlement;

pub use payout_calculator::{DEFAULT_BREACH_WINDOW_HOURS, PayoutCalculator};
pub use payout_settlement::PayoutSettlement;
