//! Drawdown Bounded Context
//!
//! Measures how far equity has fallen from its daily and overall baselines
//! and decides whether a limit was breached.
//!
//! # Key Concepts
//!
//! - **Daily drawdown**: loss since the day's anchor equity
//! - **Max drawdown**: loss from the starting balance (static) or high-water mark (trailing)
//! - **Audit**: replay of closed trades day by day

pub mod services;
pub mod value_objects;

pub use services::{DrawdownAuditService, DrawdownCalculator};
pub use value_objects::{DailyDrawdownRecord, DrawdownAudit, DrawdownInput, DrawdownResult};
