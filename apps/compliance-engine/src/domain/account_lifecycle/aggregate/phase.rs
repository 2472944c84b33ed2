//! Phase Entity
//!
//! One stage of an account with its running balance, equity and trade
//! aggregates. Phases are never deleted; they end as passed or failed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::account_lifecycle::services::PhaseStateMachine;
use crate::domain::account_lifecycle::value_objects::{BalancePolicy, PhaseStatus, PhaseType};
use crate::domain::shared::{AccountId, DomainError, Money, PhaseId};

/// Parameters for opening a phase.
#[derive(Debug, Clone)]
pub struct OpenPhaseParams {
    /// Phase identifier.
    pub id: PhaseId,
    /// Owning account.
    pub account_id: AccountId,
    /// Platform account number trades are booked against.
    pub external_id: Option<String>,
    /// Stage of the account.
    pub phase_type: PhaseType,
    /// Balance the phase starts with.
    pub starting_balance: Money,
    /// Resolved profit target; ignored for funded phases.
    pub profit_target: Option<Money>,
    /// Minimum distinct trading days.
    pub min_trading_days: u32,
    /// Calendar-day limit.
    pub max_trading_days: Option<u32>,
    /// Start time.
    pub started_at: DateTime<Utc>,
}

/// Parameters for reconstituting a phase from storage.
#[derive(Debug, Clone)]
pub struct ReconstitutedPhaseParams {
    /// Phase identifier.
    pub id: PhaseId,
    /// Owning account.
    pub account_id: AccountId,
    /// Platform account number.
    pub external_id: Option<String>,
    /// Stage of the account.
    pub phase_type: PhaseType,
    /// Persisted status.
    pub status: PhaseStatus,
    /// Balance the phase started with.
    pub starting_balance: Money,
    /// Realized balance.
    pub current_balance: Money,
    /// Realized equity.
    pub current_equity: Money,
    /// Peak equity.
    pub high_water_mark: Money,
    /// Peak equity net of balance removed by payouts.
    pub trailing_peak: Money,
    /// Resolved profit target.
    pub profit_target: Option<Money>,
    /// Minimum distinct trading days.
    pub min_trading_days: u32,
    /// Calendar-day limit.
    pub max_trading_days: Option<u32>,
    /// Realized PnL since the phase started.
    pub net_profit_since_phase_start: Money,
    /// Balance profit since the last payout is measured from.
    pub payout_baseline: Money,
    /// Closed trades.
    pub total_trades: u32,
    /// Closed trades with positive PnL.
    pub winning_trades: u32,
    /// Fees and commission paid.
    pub total_commission: Money,
    /// Start time.
    pub started_at: DateTime<Utc>,
    /// End time, once passed or failed.
    pub ended_at: Option<DateTime<Utc>>,
}

/// One stage of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    id: PhaseId,
    account_id: AccountId,
    external_id: Option<String>,
    phase_type: PhaseType,
    status: PhaseStatus,
    starting_balance: Money,
    current_balance: Money,
    current_equity: Money,
    high_water_mark: Money,
    trailing_peak: Money,
    profit_target: Option<Money>,
    min_trading_days: u32,
    max_trading_days: Option<u32>,
    net_profit_since_phase_start: Money,
    payout_baseline: Money,
    total_trades: u32,
    winning_trades: u32,
    total_commission: Money,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl Phase {
    /// Open an active phase. Balance, equity, high-water mark and payout
    /// baseline all start at `starting_balance`.
    #[must_use]
    pub fn open(params: OpenPhaseParams) -> Self {
        let profit_target = if params.phase_type.is_funded() {
            None
        } else {
            params.profit_target
        };

        Self {
            id: params.id,
            account_id: params.account_id,
            external_id: params.external_id,
            phase_type: params.phase_type,
            status: PhaseStatus::Active,
            starting_balance: params.starting_balance,
            current_balance: params.starting_balance,
            current_equity: params.starting_balance,
            high_water_mark: params.starting_balance,
            trailing_peak: params.starting_balance,
            profit_target,
            min_trading_days: params.min_trading_days,
            max_trading_days: params.max_trading_days,
            net_profit_since_phase_start: Money::ZERO,
            payout_baseline: params.starting_balance,
            total_trades: 0,
            winning_trades: 0,
            total_commission: Money::ZERO,
            started_at: params.started_at,
            ended_at: None,
        }
    }

    /// Rebuild a phase from storage.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvariantViolation` if a funded phase carries a
    /// profit target, or the trailing peak is not between current equity and
    /// the high-water mark.
    pub fn reconstitute(params: ReconstitutedPhaseParams) -> Result<Self, DomainError> {
        if params.phase_type.is_funded() && params.profit_target.is_some() {
            return Err(DomainError::InvariantViolation {
                aggregate: "Phase".to_string(),
                invariant: "funded phases have no profit target".to_string(),
                state: format!("phase {} target {:?}", params.id, params.profit_target),
            });
        }

        if params.trailing_peak < params.current_equity
            || params.high_water_mark < params.trailing_peak
        {
            return Err(DomainError::InvariantViolation {
                aggregate: "Phase".to_string(),
                invariant: "equity <= trailing peak <= high-water mark".to_string(),
                state: format!(
                    "phase {} equity {} trailing {} hwm {}",
                    params.id, params.current_equity, params.trailing_peak, params.high_water_mark
                ),
            });
        }

        Ok(Self {
            id: params.id,
            account_id: params.account_id,
            external_id: params.external_id,
            phase_type: params.phase_type,
            status: params.status,
            starting_balance: params.starting_balance,
            current_balance: params.current_balance,
            current_equity: params.current_equity,
            high_water_mark: params.high_water_mark,
            trailing_peak: params.trailing_peak,
            profit_target: params.profit_target,
            min_trading_days: params.min_trading_days,
            max_trading_days: params.max_trading_days,
            net_profit_since_phase_start: params.net_profit_since_phase_start,
            payout_baseline: params.payout_baseline,
            total_trades: params.total_trades,
            winning_trades: params.winning_trades,
            total_commission: params.total_commission,
            started_at: params.started_at,
            ended_at: params.ended_at,
        })
    }

    // =========================================================================
    // State Transitions
    // =========================================================================

    /// Apply a closed trade's realized PnL and fees.
    pub fn record_closed_trade(&mut self, pnl: Money, fees: Money) {
        self.current_equity += pnl;
        self.current_balance += pnl;
        self.net_profit_since_phase_start += pnl;
        self.total_trades = self.total_trades.saturating_add(1);
        if pnl.is_positive() {
            self.winning_trades = self.winning_trades.saturating_add(1);
        }
        self.total_commission += fees;
        self.high_water_mark = self.high_water_mark.max(self.current_equity);
        self.trailing_peak = self.trailing_peak.max(self.current_equity);
    }

    /// Activate a pending phase.
    ///
    /// # Errors
    ///
    /// Returns error if the phase is not pending.
    pub fn activate(&mut self) -> Result<(), DomainError> {
        PhaseStateMachine::validate_transition(self.status, PhaseStatus::Active)?;
        self.status = PhaseStatus::Active;
        Ok(())
    }

    /// Close the phase as passed.
    ///
    /// # Errors
    ///
    /// Returns error if the phase is not active.
    pub fn mark_passed(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.end(PhaseStatus::Passed, now)
    }

    /// Close the phase as failed.
    ///
    /// # Errors
    ///
    /// Returns error if the phase is not active.
    pub fn mark_failed(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.end(PhaseStatus::Failed, now)
    }

    fn end(&mut self, status: PhaseStatus, now: DateTime<Utc>) -> Result<(), DomainError> {
        PhaseStateMachine::validate_transition(self.status, status)?;
        self.status = status;
        self.ended_at = Some(now);
        Ok(())
    }

    /// Apply the balance effect of an executed payout of `amount`.
    ///
    /// The payout baseline always moves so the paid profit is not counted
    /// again. The high-water mark is never lowered; the trailing peak drops
    /// by whatever equity the payout removed.
    pub fn rebase_after_payout(&mut self, policy: BalancePolicy, amount: Money) {
        let equity_before = self.current_equity;
        match policy {
            BalancePolicy::ResetTo { balance } => {
                self.current_balance = balance;
                self.current_equity = balance;
                self.payout_baseline = balance;
            }
            BalancePolicy::ReduceByPayout => {
                self.current_balance -= amount;
                self.current_equity -= amount;
                self.payout_baseline = self.current_balance;
            }
            BalancePolicy::Unchanged => {
                self.payout_baseline += amount;
            }
        }
        let removed = (equity_before - self.current_equity).max(Money::ZERO);
        self.trailing_peak = (self.trailing_peak - removed).max(self.current_equity);
        self.high_water_mark = self.high_water_mark.max(self.current_equity);
        self.trailing_peak = self.trailing_peak.min(self.high_water_mark);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Realized profit since the last payout (or since the phase started).
    #[must_use]
    pub fn net_profit_since_last_payout(&self) -> Money {
        self.current_balance - self.payout_baseline
    }

    /// Returns true if the phase has a non-blank platform identifier.
    #[must_use]
    pub fn has_valid_external_id(&self) -> bool {
        self.external_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    }

    /// Whole calendar days (UTC) from the phase start to `now`.
    #[must_use]
    pub fn calendar_days_elapsed(&self, now: DateTime<Utc>) -> i64 {
        (now.date_naive() - self.started_at.date_naive()).num_days()
    }

    /// Returns true if the phase is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == PhaseStatus::Active
    }

    /// Get the phase ID.
    #[must_use]
    pub const fn id(&self) -> &PhaseId {
        &self.id
    }

    /// Get the owning account ID.
    #[must_use]
    pub const fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    /// Get the platform identifier.
    #[must_use]
    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    /// Get the phase type.
    #[must_use]
    pub const fn phase_type(&self) -> PhaseType {
        self.phase_type
    }

    /// Get the status.
    #[must_use]
    pub const fn status(&self) -> PhaseStatus {
        self.status
    }

    /// Get the starting balance.
    #[must_use]
    pub const fn starting_balance(&self) -> Money {
        self.starting_balance
    }

    /// Get the realized balance.
    #[must_use]
    pub const fn current_balance(&self) -> Money {
        self.current_balance
    }

    /// Get the realized equity.
    #[must_use]
    pub const fn current_equity(&self) -> Money {
        self.current_equity
    }

    /// Get the peak equity.
    #[must_use]
    pub const fn high_water_mark(&self) -> Money {
        self.high_water_mark
    }

    /// Get the peak equity net of payouts; trailing drawdown measures from here.
    #[must_use]
    pub const fn trailing_peak(&self) -> Money {
        self.trailing_peak
    }

    /// Get the profit target; always `None` for funded phases.
    #[must_use]
    pub const fn profit_target(&self) -> Option<Money> {
        self.profit_target
    }

    /// Get the minimum trading days.
    #[must_use]
    pub const fn min_trading_days(&self) -> u32 {
        self.min_trading_days
    }

    /// Get the calendar-day limit.
    #[must_use]
    pub const fn max_trading_days(&self) -> Option<u32> {
        self.max_trading_days
    }

    /// Get the realized PnL since the phase started.
    #[must_use]
    pub const fn net_profit_since_phase_start(&self) -> Money {
        self.net_profit_since_phase_start
    }

    /// Get the payout baseline.
    #[must_use]
    pub const fn payout_baseline(&self) -> Money {
        self.payout_baseline
    }

    /// Get the number of closed trades.
    #[must_use]
    pub const fn total_trades(&self) -> u32 {
        self.total_trades
    }

    /// Get the number of winning trades.
    #[must_use]
    pub const fn winning_trades(&self) -> u32 {
        self.winning_trades
    }

    /// Get the fees and commission paid.
    #[must_use]
    pub const fn total_commission(&self) -> Money {
        self.total_commission
    }

    /// Get the start time.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Get the end time.
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }
}
