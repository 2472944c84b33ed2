//! Equity history point.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::shared::{Money, PhaseId};

/// Balance/equity of a phase after a processed trade event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquitySnapshot {
    /// Owning phase.
    pub phase_id: PhaseId,
    /// Snapshot time.
    pub taken_at: DateTime<Utc>,
    /// Realized balance.
    pub balance: Money,
    /// Balance plus open PnL.
    pub equity: Money,
    /// Unrealized PnL of the open position; zero once closed.
    pub open_pnl: Money,
}
