//! Daily drawdown anchor.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{Money, PhaseId};

/// Equity at the start of one calendar day of a phase.
///
/// One per (phase, date); the baseline for that day's drawdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAnchor {
    /// Owning phase.
    pub phase_id: PhaseId,
    /// UTC calendar date.
    pub date: NaiveDate,
    /// Equity at the start of `date`.
    pub anchor_equity: Money,
}

impl DailyAnchor {
    /// Create an anchor.
    #[must_use]
    pub const fn new(phase_id: PhaseId, date: NaiveDate, anchor_equity: Money) -> Self {
        Self {
            phase_id,
            date,
            anchor_equity,
        }
    }

    /// Returns true if this anchor applies to `phase_id` on `date`.
    #[must_use]
    pub fn covers(&self, phase_id: &PhaseId, date: NaiveDate) -> bool {
        &self.phase_id == phase_id && self.date == date
    }
}
