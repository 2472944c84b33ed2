//! Drawdown evaluation result.

use serde::{Deserialize, Serialize};

use crate::domain::account_lifecycle::BreachType;
use crate::domain::shared::Money;

/// Outcome of one drawdown evaluation.
///
/// A `None` limit means the rule is disabled; its remaining amount is then
/// also `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawdownResult {
    /// Loss since the day's start balance, floored at zero.
    pub daily_used: Money,
    /// Daily limit.
    pub daily_limit: Option<Money>,
    /// Room left before the daily limit, floored at zero.
    pub daily_remaining: Option<Money>,
    /// Loss from the max-drawdown baseline, floored at zero.
    pub max_used: Money,
    /// Max limit.
    pub max_limit: Option<Money>,
    /// Room left before the max limit, floored at zero.
    pub max_remaining: Option<Money>,
    /// Whether a limit was exceeded.
    pub is_breached: bool,
    /// Violated limit; daily wins when both are exceeded.
    pub breach_type: Option<BreachType>,
    /// Drawdown used on the violated limit.
    pub breach_amount: Option<Money>,
    /// Value of the violated limit.
    pub breach_threshold: Option<Money>,
}
