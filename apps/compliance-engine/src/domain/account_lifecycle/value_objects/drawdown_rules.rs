//! Drawdown and target amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::Money;

/// How a rule amount is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountKind {
    /// Percentage of a base balance (0-100 scale).
    #[default]
    Percent,
    /// Absolute amount in the account currency.
    Fixed,
}

/// An amount that is either a percentage of some base or a fixed value.
///
/// Used for drawdown limits and profit targets. A non-positive amount means
/// the rule is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleAmount {
    /// Configured amount.
    pub amount: Decimal,
    /// Interpretation of `amount`.
    pub kind: AmountKind,
}

impl RuleAmount {
    /// A percentage rule.
    #[must_use]
    pub const fn percent(amount: Decimal) -> Self {
        Self {
            amount,
            kind: AmountKind::Percent,
        }
    }

    /// A fixed-amount rule.
    #[must_use]
    pub const fn fixed(amount: Decimal) -> Self {
        Self {
            amount,
            kind: AmountKind::Fixed,
        }
    }

    /// A disabled rule.
    #[must_use]
    pub const fn disabled() -> Self {
        Self::fixed(Decimal::ZERO)
    }

    /// Returns true if the rule applies.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Resolve the rule against `base`, or `None` when disabled.
    #[must_use]
    pub fn resolve(&self, base: Money) -> Option<Money> {
        if !self.is_enabled() {
            return None;
        }
        Some(match self.kind {
            AmountKind::Percent => base.percent_of(self.amount),
            AmountKind::Fixed => Money::new(self.amount),
        })
    }
}

impl fmt::Display for RuleAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AmountKind::Percent => write!(f, "{}%", self.amount),
            AmountKind::Fixed => write!(f, "${:.2}", self.amount),
        }
    }
}

/// Baseline used for the max drawdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawdownMode {
    /// Measured from the account starting balance.
    Static,
    /// Measured from the phase high-water mark.
    Trailing,
}

/// Daily and max drawdown configuration of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawdownRules {
    /// Daily loss limit, measured from the day's anchor equity.
    pub daily: RuleAmount,
    /// Overall loss limit.
    pub max: RuleAmount,
    /// Baseline for the overall limit.
    pub mode: DrawdownMode,
}

impl DrawdownRules {
    /// Create drawdown rules.
    #[must_use]
    pub const fn new(daily: RuleAmount, max: RuleAmount, mode: DrawdownMode) -> Self {
        Self { daily, max, mode }
    }
}
