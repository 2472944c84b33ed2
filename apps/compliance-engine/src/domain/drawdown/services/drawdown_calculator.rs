//! Drawdown Calculator
//!
//! Pure evaluation of daily and max drawdown for one equity reading.

use crate::domain::account_lifecycle::{BreachType, DrawdownMode, DrawdownRules};
use crate::domain::drawdown::value_objects::{DrawdownInput, DrawdownResult};
use crate::domain::shared::Money;

/// Stateless drawdown calculator.
///
/// The daily limit resolves against the day's start balance. The max limit
/// resolves against the starting balance (static) or the high-water mark
/// (trailing). Only one breach is reported per evaluation; daily is checked
/// first.
pub struct DrawdownCalculator;

impl DrawdownCalculator {
    /// Evaluate `input` against `rules`.
    #[must_use]
    pub fn evaluate(rules: &DrawdownRules, input: &DrawdownInput) -> DrawdownResult {
        let daily_base = input.daily_start_balance;
        let daily_limit = rules.daily.resolve(daily_base);
        let daily_used = (daily_base - input.current_equity).non_negative();

        let max_base = match rules.mode {
            DrawdownMode::Static => input.starting_balance,
            DrawdownMode::Trailing => input.high_water_mark,
        };
        let max_limit = rules.max.resolve(max_base);
        let max_used = (max_base - input.current_equity).non_negative();

        let breach = Self::exceeded(daily_used, daily_limit)
            .map(|limit| (BreachType::DailyDrawdown, daily_used, limit))
            .or_else(|| {
                Self::exceeded(max_used, max_limit)
                    .map(|limit| (BreachType::MaxDrawdown, max_used, limit))
            });

        DrawdownResult {
            daily_used,
            daily_limit,
            daily_remaining: daily_limit.map(|l| (l - daily_used).non_negative()),
            max_used,
            max_limit,
            max_remaining: max_limit.map(|l| (l - max_used).non_negative()),
            is_breached: breach.is_some(),
            breach_type: breach.map(|(t, _, _)| t),
            breach_amount: breach.map(|(_, used, _)| used),
            breach_threshold: breach.map(|(_, _, limit)| limit),
        }
    }

    fn exceeded(used: Money, limit: Option<Money>) -> Option<Money> {
        limit.filter(|l| used > *l)
    }
}
