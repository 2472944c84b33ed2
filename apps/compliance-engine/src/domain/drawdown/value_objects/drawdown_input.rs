//! Equity state a drawdown evaluation runs against.

use serde::{Deserialize, Serialize};

use crate::domain::account_lifecycle::{DailyAnchor, Phase};
use crate::domain::shared::Money;

/// Balances fed to [`DrawdownCalculator`](crate::domain::drawdown::DrawdownCalculator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawdownInput {
    /// Equity being checked, including open PnL.
    pub current_equity: Money,
    /// Equity at the start of the current day.
    pub daily_start_balance: Money,
    /// Peak equity of the phase, net of payouts.
    pub high_water_mark: Money,
    /// Starting balance of the account.
    pub starting_balance: Money,
}

impl DrawdownInput {
    /// Build the input for `phase` at `current_equity`.
    ///
    /// The day's baseline is the anchor's equity, or the account starting
    /// balance when no anchor exists yet. Trailing drawdown measures from the
    /// phase's peak net of payouts, so a payout is not read as a loss.
    #[must_use]
    pub fn for_phase(
        phase: &Phase,
        current_equity: Money,
        anchor: Option<&DailyAnchor>,
        starting_balance: Money,
    ) -> Self {
        Self {
            current_equity,
            daily_start_balance: anchor.map_or(starting_balance, |a| a.anchor_equity),
            high_water_mark: phase.trailing_peak(),
            starting_balance,
        }
    }
}
