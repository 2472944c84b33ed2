//! Per-phase objectives.

use serde::{Deserialize, Serialize};

use super::{PhaseType, RuleAmount};

/// Objectives of one evaluation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTargets {
    /// Profit target, resolved against the phase starting balance.
    pub profit_target: RuleAmount,
    /// Minimum distinct trading days before advancing.
    pub min_trading_days: u32,
    /// Calendar-day limit for the phase, if any.
    pub max_trading_days: Option<u32>,
}

/// Objectives for every phase of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseRules {
    /// First evaluation phase.
    pub phase_1: PhaseTargets,
    /// Second evaluation phase; required for two-step accounts.
    pub phase_2: Option<PhaseTargets>,
    /// Minimum trading days tracked on the funded phase.
    #[serde(default)]
    pub funded_min_trading_days: u32,
}

impl PhaseRules {
    /// Evaluation targets for `phase_type`. The funded phase has none.
    #[must_use]
    pub const fn targets_for(&self, phase_type: PhaseType) -> Option<&PhaseTargets> {
        match phase_type {
            PhaseType::Phase1 => Some(&self.phase_1),
            PhaseType::Phase2 => self.phase_2.as_ref(),
            PhaseType::Funded => None,
        }
    }
}
