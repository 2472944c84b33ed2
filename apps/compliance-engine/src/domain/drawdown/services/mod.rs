//! Drawdown services.

mod drawdown_audit;
mod drawdown_calculator;

pub use drawdown_audit::DrawdownAuditService;
pub use drawdown_calculator::DrawdownCalculator;
