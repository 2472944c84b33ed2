//! Performance value objects.

mod risk_metrics;

pub use risk_metrics::RiskMetrics;
