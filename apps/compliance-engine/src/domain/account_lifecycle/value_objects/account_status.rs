//! Account status in the challenge lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account status.
///
/// Transitions only move toward a terminal state; see
/// [`AccountStatusMachine`](crate::domain::account_lifecycle::AccountStatusMachine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Account is in an evaluation phase.
    Active,
    /// Account passed its evaluation and awaits funding.
    Passed,
    /// Account trades a funded phase.
    Funded,
    /// Account breached a rule. Terminal.
    Failed,
}

impl AccountStatus {
    /// Returns true once the account can no longer change state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Returns true if the account still accepts trades.
    #[must_use]
    pub const fn accepts_trades(&self) -> bool {
        !self.is_terminal()
    }

    /// Snake-case name used in storage and wire formats.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Passed => "passed",
            Self::Funded => "funded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
