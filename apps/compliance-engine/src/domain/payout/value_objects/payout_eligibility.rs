//! Payout eligibility result types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{Money, Percentage};

/// Condition that blocks a payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockerKind {
    /// Phase is not funded.
    NotFunded,
    /// Too few days since funding.
    MinDaysToFirstPayout,
    /// Payout cycle has not elapsed since the last payout.
    PayoutCycle,
    /// Not enough profit since the last payout.
    MinProfit,
    /// A breach was recorded recently.
    RecentBreach,
}

impl fmt::Display for BlockerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::NotFunded => "NOT_FUNDED",
            Self::MinDaysToFirstPayout => "MIN_DAYS_TO_FIRST_PAYOUT",
            Self::PayoutCycle => "PAYOUT_CYCLE",
            Self::MinProfit => "MIN_PROFIT",
            Self::RecentBreach => "RECENT_BREACH",
        };
        f.write_str(code)
    }
}

/// A failed payout condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutBlocker {
    /// Failed condition.
    pub kind: BlockerKind,
    /// Human-readable message.
    pub message: String,
}

impl PayoutBlocker {
    /// Create a blocker.
    #[must_use]
    pub fn new(kind: BlockerKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for PayoutBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Payout eligibility of a funded phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutEligibility {
    /// True only when `blockers` is empty.
    pub is_eligible: bool,
    /// Amount that may be withdrawn, never negative.
    pub eligible_amount: Money,
    /// Trader split after escalation.
    pub profit_split_percent: Percentage,
    /// Trader's part of `eligible_amount`.
    pub trader_share: Money,
    /// Firm's part of `eligible_amount`.
    pub firm_share: Money,
    /// Earliest date the time-based conditions clear.
    pub next_eligible_date: Option<NaiveDate>,
    /// Every failed condition.
    pub blockers: Vec<PayoutBlocker>,
}

impl PayoutEligibility {
    /// Returns true if a blocker of `kind` is present.
    #[must_use]
    pub fn is_blocked_by(&self, kind: BlockerKind) -> bool {
        self.blockers.iter().any(|b| b.kind == kind)
    }
}
