//! Drawdown breach record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{AccountId, BreachId, Money, PhaseId};

/// Which drawdown limit was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreachType {
    /// Loss since the day's anchor exceeded the daily limit.
    DailyDrawdown,
    /// Loss from the max-drawdown baseline exceeded the max limit.
    MaxDrawdown,
}

impl BreachType {
    /// Name used in storage and wire formats.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DailyDrawdown => "daily_drawdown",
            Self::MaxDrawdown => "max_drawdown",
        }
    }
}

impl fmt::Display for BreachType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected drawdown violation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breach {
    id: BreachId,
    account_id: AccountId,
    phase_id: PhaseId,
    breach_type: BreachType,
    breach_amount: Money,
    breach_threshold: Money,
    equity_at_breach: Money,
    created_at: DateTime<Utc>,
}

impl Breach {
    /// Record a breach.
    #[must_use]
    pub fn new(
        account_id: AccountId,
        phase_id: PhaseId,
        breach_type: BreachType,
        breach_amount: Money,
        breach_threshold: Money,
        equity_at_breach: Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: BreachId::generate(),
            account_id,
            phase_id,
            breach_type,
            breach_amount,
            breach_threshold,
            equity_at_breach,
            created_at,
        }
    }

    /// Get the breach ID.
    #[must_use]
    pub const fn id(&self) -> &BreachId {
        &self.id
    }

    /// Get the account ID.
    #[must_use]
    pub const fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    /// Get the phase ID.
    #[must_use]
    pub const fn phase_id(&self) -> &PhaseId {
        &self.phase_id
    }

    /// Get the violated limit.
    #[must_use]
    pub const fn breach_type(&self) -> BreachType {
        self.breach_type
    }

    /// Drawdown used at the time of the breach.
    #[must_use]
    pub const fn breach_amount(&self) -> Money {
        self.breach_amount
    }

    /// Limit that was exceeded.
    #[must_use]
    pub const fn breach_threshold(&self) -> Money {
        self.breach_threshold
    }

    /// Equity when the breach was detected.
    #[must_use]
    pub const fn equity_at_breach(&self) -> Money {
        self.equity_at_breach
    }

    /// Detection time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
