//! Drawdown Audit Service
//!
//! Replays a closed-trade history day by day to find past limit breaches.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::account_lifecycle::{DrawdownRules, Trade};
use crate::domain::drawdown::value_objects::{DailyDrawdownRecord, DrawdownAudit};
use crate::domain::shared::Money;

/// Historical drawdown replay.
///
/// Limits resolve against the starting balance and the max drawdown is
/// measured statically from it, whatever mode the account uses.
pub struct DrawdownAuditService;

impl DrawdownAuditService {
    /// Replay `trades` from `starting_balance`.
    ///
    /// Open trades are ignored. Trades are applied in exit-time order, so
    /// callers may pass them unsorted.
    #[must_use]
    pub fn audit(rules: &DrawdownRules, starting_balance: Money, trades: &[Trade]) -> DrawdownAudit {
        let mut closed: Vec<(&Trade, NaiveDate, Money)> = trades
            .iter()
            .filter_map(|t| Some((t, t.exit_date()?, t.realized_pnl()?)))
            .collect();
        closed.sort_by_key(|(t, _, _)| t.exit_at());

        let daily_limit = rules.daily.resolve(starting_balance);
        let max_limit = rules.max.resolve(starting_balance);

        let mut balance = starting_balance;
        let mut lowest_balance = starting_balance;
        let mut by_day: BTreeMap<NaiveDate, (Money, usize)> = BTreeMap::new();
        let mut first_max_violation: Option<NaiveDate> = None;

        for (_, date, pnl) in &closed {
            balance += *pnl;
            lowest_balance = lowest_balance.min(balance);

            let entry = by_day.entry(*date).or_insert((Money::ZERO, 0));
            entry.0 += *pnl;
            entry.1 += 1;

            if first_max_violation.is_none()
                && max_limit.is_some_and(|l| starting_balance - balance > l)
            {
                first_max_violation = Some(*date);
            }
        }

        let mut start_balance = starting_balance;
        let days: Vec<DailyDrawdownRecord> = by_day
            .into_iter()
            .map(|(date, (net_pnl, trade_count))| {
                let day_loss = if net_pnl.is_negative() {
                    net_pnl.abs()
                } else {
                    Money::ZERO
                };
                let end_balance = start_balance + net_pnl;
                let record = DailyDrawdownRecord {
                    date,
                    start_balance,
                    end_balance,
                    net_pnl,
                    trade_count,
                    day_loss,
                    daily_limit,
                    breached: daily_limit.is_some_and(|l| day_loss > l),
                };
                start_balance = end_balance;
                record
            })
            .collect();

        let max_drawdown_used = (starting_balance - lowest_balance).non_negative();
        let first_daily_violation = days.iter().find(|d| d.breached).map(|d| d.date);
        let first_violation = match (first_daily_violation, first_max_violation) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        tracing::debug!(
            days = days.len(),
            lowest_balance = %lowest_balance,
            max_drawdown_used = %max_drawdown_used,
            "Drawdown audit replayed"
        );

        DrawdownAudit {
            days,
            lowest_balance,
            max_drawdown_used,
            max_limit,
            max_breached: max_limit.is_some_and(|l| max_drawdown_used > l),
            first_violation,
        }
    }
}
