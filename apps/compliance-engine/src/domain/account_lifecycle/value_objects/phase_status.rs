//! Phase status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a single account phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    /// Created but not yet trading.
    Pending,
    /// Currently trading.
    Active,
    /// Objectives met; a successor phase was created.
    Passed,
    /// Breached or ran out of time.
    Failed,
}

impl PhaseStatus {
    /// Returns true if the phase is closed for good.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }

    /// Snake-case name used in storage and wire formats.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
