//! Historical drawdown audit report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::shared::Money;

/// One trading day of an audit replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyDrawdownRecord {
    /// UTC exit date.
    pub date: NaiveDate,
    /// Balance at the end of the previous trading day.
    pub start_balance: Money,
    /// Balance after the day's trades.
    pub end_balance: Money,
    /// Net realized PnL of the day.
    pub net_pnl: Money,
    /// Trades closed on the day.
    pub trade_count: usize,
    /// Magnitude of a losing day; zero otherwise.
    pub day_loss: Money,
    /// Daily limit applied.
    pub daily_limit: Option<Money>,
    /// Whether `day_loss` exceeded the limit.
    pub breached: bool,
}

/// Result of replaying a closed-trade history against drawdown rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawdownAudit {
    /// Per-day records in date order.
    pub days: Vec<DailyDrawdownRecord>,
    /// Lowest balance after any single trade.
    pub lowest_balance: Money,
    /// Starting balance minus the lowest balance, floored at zero.
    pub max_drawdown_used: Money,
    /// Max limit applied.
    pub max_limit: Option<Money>,
    /// Whether `max_drawdown_used` exceeded the limit.
    pub max_breached: bool,
    /// First day that broke either limit.
    pub first_violation: Option<NaiveDate>,
}

impl DrawdownAudit {
    /// Days that broke the daily limit.
    pub fn daily_breaches(&self) -> impl Iterator<Item = &DailyDrawdownRecord> {
        self.days.iter().filter(|d| d.breached)
    }

    /// Returns true if no limit was broken.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.first_violation.is_none()
    }
}
