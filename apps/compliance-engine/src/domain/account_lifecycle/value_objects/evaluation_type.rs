//! Evaluation type and phase type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of an account's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseType {
    /// First evaluation phase.
    #[serde(rename = "phase_1")]
    Phase1,
    /// Second evaluation phase (two-step challenges only).
    #[serde(rename = "phase_2")]
    Phase2,
    /// Funded phase. Terminal success state with no profit target.
    #[serde(rename = "funded")]
    Funded,
}

impl PhaseType {
    /// Returns true for the funded phase.
    #[must_use]
    pub const fn is_funded(&self) -> bool {
        matches!(self, Self::Funded)
    }

    /// Name used in storage and wire formats.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Phase1 => "phase_1",
            Self::Phase2 => "phase_2",
            Self::Funded => "funded",
        }
    }
}

impl fmt::Display for PhaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of profit-target phases before an account is funded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationType {
    /// phase_1 -> funded.
    OneStep,
    /// phase_1 -> phase_2 -> funded.
    TwoStep,
}

impl EvaluationType {
    /// Resolve the phase that follows `current`, if any.
    ///
    /// Returns `None` for the funded phase and for phases that do not exist
    /// under this evaluation type (phase_2 of a one-step account).
    #[must_use]
    pub const fn next_phase(&self, current: PhaseType) -> Option<PhaseType> {
        match (self, current) {
            (Self::OneStep, PhaseType::Phase1) | (Self::TwoStep, PhaseType::Phase2) => {
                Some(PhaseType::Funded)
            }
            (Self::TwoStep, PhaseType::Phase1) => Some(PhaseType::Phase2),
            (Self::OneStep, PhaseType::Phase2) | (_, PhaseType::Funded) => None,
        }
    }

    /// Number of evaluation phases before funding.
    #[must_use]
    pub const fn evaluation_phases(&self) -> u8 {
        match self {
            Self::OneStep => 1,
            Self::TwoStep => 2,
        }
    }

    /// Name used in storage and wire formats.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OneStep => "one_step",
            Self::TwoStep => "two_step",
        }
    }
}

impl fmt::Display for EvaluationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
