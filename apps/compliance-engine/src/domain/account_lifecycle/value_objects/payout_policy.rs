//! Payout configuration of a funded account.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{Money, Percentage};

/// What happens to the funded balance after a payout executes.
///
/// Exactly one policy applies per account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum BalancePolicy {
    /// Balance and equity reset to a fixed value.
    ResetTo {
        /// Balance after reset.
        balance: Money,
    },
    /// The payout amount is subtracted from balance and equity.
    ReduceByPayout,
    /// Balance is left unchanged.
    Unchanged,
}

impl BalancePolicy {
    /// Build the policy from the two legacy flags. `reset_on_payout` wins
    /// when both are set.
    #[must_use]
    pub const fn from_flags(
        reset_on_payout: bool,
        reduce_balance_by_payout: bool,
        reset_balance: Money,
    ) -> Self {
        if reset_on_payout {
            Self::ResetTo {
                balance: reset_balance,
            }
        } else if reduce_balance_by_payout {
            Self::ReduceByPayout
        } else {
            Self::Unchanged
        }
    }
}

/// Payout rules of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutPolicy {
    /// Trader split for the first payout.
    pub initial_profit_split: Percentage,
    /// Split added for every completed payout.
    pub split_increment_per_payout: Percentage,
    /// Upper bound of the trader split.
    pub max_profit_split: Percentage,
    /// Days required between payouts.
    pub payout_cycle_days: u32,
    /// Days after funding before the first payout.
    pub min_days_to_first_payout: u32,
    /// Minimum net profit since the last payout.
    pub min_profit: Money,
    /// Cap on a single payout.
    pub max_payout_amount: Option<Money>,
    /// Balance effect after a payout.
    pub balance_policy: BalancePolicy,
}
