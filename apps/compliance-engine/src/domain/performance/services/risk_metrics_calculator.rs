//! Risk Metrics Calculator

use rust_decimal::Decimal;

use crate::domain::account_lifecycle::Trade;
use crate::domain::performance::value_objects::RiskMetrics;
use crate::domain::shared::{Money, Percentage};

/// Profit factor reported when there are wins and no losses.
pub const PROFIT_FACTOR_CAP: Decimal = Decimal::from_parts(99999, 0, 0, false, 2); // 999.99

/// Stateless risk metrics calculator.
pub struct RiskMetricsCalculator;

impl RiskMetricsCalculator {
    /// Compute metrics over the closed trades in `trades`.
    #[must_use]
    pub fn calculate(trades: &[Trade]) -> RiskMetrics {
        Self::calculate_with_cap(trades, PROFIT_FACTOR_CAP)
    }

    /// Compute metrics with a custom profit factor cap.
    ///
    /// Trades are walked in exit-time order for streaks. A zero-PnL trade
    /// ends the current streak.
    #[must_use]
    pub fn calculate_with_cap(trades: &[Trade], profit_factor_cap: Decimal) -> RiskMetrics {
        let mut closed: Vec<&Trade> = trades.iter().filter(|t| t.is_closed()).collect();
        if closed.is_empty() {
            return RiskMetrics::default();
        }
        closed.sort_by_key(|t| t.exit_at());

        let pnls: Vec<Money> = closed.iter().filter_map(|t| t.realized_pnl()).collect();

        let (gross_profit, gross_loss, winning_trades, losing_trades) = Self::trade_stats(&pnls);
        let total_trades = pnls.len();

        let win_rate = Percentage::ratio(Decimal::from(winning_trades), Decimal::from(total_trades));
        let avg_win = mean(gross_profit, winning_trades);
        let avg_loss = mean(gross_loss, losing_trades);

        let profit_factor = if gross_loss.is_positive() {
            gross_profit
                .amount()
                .checked_div(gross_loss.amount())
                .map_or(profit_factor_cap, |pf| pf.min(profit_factor_cap))
        } else if gross_profit.is_positive() {
            profit_factor_cap
        } else {
            Decimal::ZERO
        };

        // Expectancy = (WinRate * AvgWin) - (LossRate * AvgLoss)
        let total = Decimal::from(total_trades);
        let win_fraction = Decimal::from(winning_trades) / total;
        let loss_fraction = Decimal::from(losing_trades) / total;
        let expectancy = avg_win * win_fraction - avg_loss * loss_fraction;

        let (current_streak, best_streak, worst_streak) = Self::streaks(&pnls);

        RiskMetrics {
            total_trades,
            winning_trades,
            losing_trades,
            win_rate,
            avg_win,
            avg_loss,
            gross_profit,
            gross_loss,
            profit_factor,
            largest_win: pnls.iter().copied().max().unwrap_or(Money::ZERO).non_negative(),
            largest_loss: pnls
                .iter()
                .copied()
                .min()
                .map_or(Money::ZERO, |m| (-m).non_negative()),
            net_pnl: pnls.iter().sum(),
            expectancy,
            current_streak,
            best_streak,
            worst_streak,
        }
    }

    fn trade_stats(pnls: &[Money]) -> (Money, Money, usize, usize) {
        let mut gross_profit = Money::ZERO;
        let mut gross_loss = Money::ZERO;
        let mut winning = 0;
        let mut losing = 0;

        for pnl in pnls {
            if pnl.is_positive() {
                gross_profit += *pnl;
                winning += 1;
            } else if pnl.is_negative() {
                gross_loss += pnl.abs();
                losing += 1;
            }
        }

        (gross_profit, gross_loss, winning, losing)
    }

    fn streaks(pnls: &[Money]) -> (i32, i32, i32) {
        let mut current: i32 = 0;
        let mut best: i32 = 0;
        let mut worst: i32 = 0;

        for pnl in pnls {
            current = if pnl.is_positive() {
                current.max(0).saturating_add(1)
            } else if pnl.is_negative() {
                current.min(0).saturating_sub(1)
            } else {
                0
            };
            best = best.max(current);
            worst = worst.min(current);
        }

        (current, best, worst)
    }
}

fn mean(total: Money, count: usize) -> Money {
    if count == 0 {
        Money::ZERO
    } else {
        Money::new(total.amount() / Decimal::from(count))
    }
}
