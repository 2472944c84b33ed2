//! Performance Bounded Context
//!
//! Trade statistics of a phase: win rate, averages, profit factor, streaks.

pub mod services;
pub mod value_objects;

pub use services::{PROFIT_FACTOR_CAP, RiskMetricsCalculator};
pub use value_objects::RiskMetrics;
