//! Performance services.

mod risk_metrics_calculator;

pub use risk_metrics_calculator::{PROFIT_FACTOR_CAP, RiskMetricsCalculator};
