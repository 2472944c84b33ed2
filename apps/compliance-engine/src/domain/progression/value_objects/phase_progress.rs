//! Phase progress report.

use serde::{Deserialize, Serialize};

use crate::domain::account_lifecycle::PhaseType;
use crate::domain::shared::{Money, Percentage};

/// Outcome of the consistency rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyCheck {
    /// Configured cap on one day's share of total profit.
    pub rule: Option<Percentage>,
    /// Sum of daily realized PnL.
    pub total_profit: Money,
    /// Most profitable day.
    pub best_day_profit: Money,
    /// Best day as a share of total profit; `None` when total profit is not positive.
    pub best_day_share: Option<Percentage>,
    /// Whether the rule is satisfied.
    pub met: bool,
}

/// Progress of a phase toward its objectives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseProgress {
    /// Evaluated phase.
    pub phase_type: PhaseType,
    /// Net profit as a share of the target, clamped to `[0, 100]`.
    pub profit_progress_percent: Percentage,
    /// Whether the profit target was reached.
    pub profit_target_met: bool,
    /// Distinct UTC entry dates of closed trades.
    pub trading_days_complete: u32,
    /// Whether the minimum trading days were reached.
    pub min_trading_days_met: bool,
    /// Consistency rule outcome.
    pub consistency: ConsistencyCheck,
    /// Whether the phase may advance.
    pub ready_to_advance: bool,
    /// Phase that follows when ready.
    pub next_phase_type: Option<PhaseType>,
    /// Unmet objectives.
    pub failure_reasons: Vec<String>,
}

impl PhaseProgress {
    /// Whether the consistency rule is satisfied.
    #[must_use]
    pub const fn consistency_met(&self) -> bool {
        self.consistency.met
    }
}
