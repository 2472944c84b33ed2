//! Risk metrics summary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{Money, Percentage};

/// Trade statistics over a phase's closed trades.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Closed trades.
    pub total_trades: usize,
    /// Trades with positive PnL.
    pub winning_trades: usize,
    /// Trades with negative PnL.
    pub losing_trades: usize,
    /// Winners as a share of all closed trades.
    pub win_rate: Percentage,
    /// Mean winning PnL.
    pub avg_win: Money,
    /// Mean losing PnL as a magnitude.
    pub avg_loss: Money,
    /// Sum of winning PnL.
    pub gross_profit: Money,
    /// Sum of losing PnL as a magnitude.
    pub gross_loss: Money,
    /// Gross profit over gross loss; capped when there are no losses.
    pub profit_factor: Decimal,
    /// Largest single win.
    pub largest_win: Money,
    /// Largest single loss as a magnitude.
    pub largest_loss: Money,
    /// Sum of all PnL.
    pub net_pnl: Money,
    /// Expected PnL per trade.
    pub expectancy: Money,
    /// Signed run at the end of the history: positive wins, negative losses.
    pub current_streak: i32,
    /// Longest win run.
    pub best_streak: i32,
    /// Longest loss run, as a negative number.
    pub worst_streak: i32,
}
