//! Account Ledger
//!
//! In-memory state of one account across its phases. Applies trade and
//! payout events through the use cases and keeps every record they produce,
//! the way a repository would persist them.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::application::dto::TradeInputDto;
use crate::application::use_cases::process_trade::{ProcessTradeUseCase, TradeContext, TradeOutcome};
use crate::domain::account_lifecycle::{
    Account, Breach, DailyAnchor, LifecycleError, Payout, PayoutHistory, Phase, Trade,
};
use crate::domain::drawdown::{DrawdownAudit, DrawdownAuditService};
use crate::domain::payout::{PayoutCalculator, PayoutEligibility, PayoutSettlement};
use crate::domain::performance::{RiskMetrics, RiskMetricsCalculator};
use crate::domain::shared::{DomainError, Money};
use crate::error::EngineError;

/// One account with its phases and records.
///
/// The current phase is always the newest one; earlier phases are kept for
/// reporting only.
#[derive(Debug, Clone)]
pub struct AccountLedger {
    account: Account,
    phase: Phase,
    past_phases: Vec<Phase>,
    phase_trades: Vec<Trade>,
    past_trades: Vec<Trade>,
    breaches: Vec<Breach>,
    anchors: Vec<DailyAnchor>,
    payouts: PayoutHistory,
}

impl AccountLedger {
    /// Start a ledger for a freshly opened account.
    #[must_use]
    pub fn new(account: Account, phase: Phase) -> Self {
        Self {
            account,
            phase,
            past_phases: Vec::new(),
            phase_trades: Vec::new(),
            past_trades: Vec::new(),
            breaches: Vec::new(),
            anchors: Vec::new(),
            payouts: PayoutHistory::empty(),
        }
    }

    /// Book a trade event on the current phase.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`ProcessTradeUseCase::apply_trade`],
    /// and `DUPLICATE_TRADE` when an earlier phase already booked the ID.
    /// The ledger is unchanged on error.
    pub fn apply_trade(
        &mut self,
        input: &TradeInputDto,
        now: DateTime<Utc>,
    ) -> Result<TradeOutcome, EngineError> {
        if let Some(id) = input.id.as_deref()
            && let Some(existing) = self.past_trades.iter().find(|t| t.id().as_str() == id)
        {
            return Err(LifecycleError::DuplicateTrade {
                trade_id: existing.id().clone(),
            }
            .into());
        }

        let outcome = ProcessTradeUseCase::apply_trade(self.context(), input, now)?;
        self.commit(&outcome);
        Ok(outcome)
    }

    /// Close an open trade of the current phase.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND` if the current phase has no trade `trade_id`, plus
    /// the validation errors of [`ProcessTradeUseCase::close_trade`].
    pub fn close_trade(
        &mut self,
        trade_id: &str,
        exit_price: Option<f64>,
        exit_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<TradeOutcome, EngineError> {
        let trade = self
            .phase_trades
            .iter()
            .find(|t| t.id().as_str() == trade_id)
            .ok_or_else(|| DomainError::NotFound {
                entity_type: "Trade".to_string(),
                id: trade_id.to_string(),
            })?
            .clone();

        let outcome =
            ProcessTradeUseCase::close_trade(self.context(), &trade, exit_price, exit_at, now)?;
        self.commit(&outcome);
        Ok(outcome)
    }

    /// Payout eligibility of the current phase at `now`.
    ///
    /// Breaches recorded within `breach_window` before `now` block the payout.
    #[must_use]
    pub fn payout_eligibility(&self, now: DateTime<Utc>, breach_window: Duration) -> PayoutEligibility {
        let recent_breach = PayoutCalculator::has_breach_within(&self.breaches, now, breach_window);
        PayoutCalculator::evaluate(
            self.account.payout(),
            &self.phase,
            &self.payouts,
            recent_breach,
            now,
        )
    }

    /// Settle a payout on the current phase.
    ///
    /// Without an explicit `amount` the full eligible amount is paid.
    ///
    /// # Errors
    ///
    /// Returns `PAYOUT_NOT_ELIGIBLE` or `INVALID_PAYOUT_AMOUNT`; the ledger is
    /// unchanged on error.
    pub fn request_payout(
        &mut self,
        amount: Option<Money>,
        now: DateTime<Utc>,
        breach_window: Duration,
    ) -> Result<Payout, EngineError> {
        let eligibility = self.payout_eligibility(now, breach_window);
        let amount = amount.unwrap_or(eligibility.eligible_amount);

        let payout = PayoutSettlement::settle(
            &self.account,
            &mut self.phase,
            &mut self.payouts,
            &eligibility,
            amount,
            now,
        )?;
        Ok(payout)
    }

    /// Trade statistics over every closed trade of the account.
    #[must_use]
    pub fn risk_metrics(&self, profit_factor_cap: Decimal) -> RiskMetrics {
        let trades: Vec<Trade> = self.trades().cloned().collect();
        RiskMetricsCalculator::calculate_with_cap(&trades, profit_factor_cap)
    }

    /// Day-by-day drawdown replay of the whole account history.
    #[must_use]
    pub fn drawdown_audit(&self) -> DrawdownAudit {
        let trades: Vec<Trade> = self.trades().cloned().collect();
        DrawdownAuditService::audit(
            self.account.drawdown(),
            self.account.starting_balance(),
            &trades,
        )
    }

    /// Get the account.
    #[must_use]
    pub const fn account(&self) -> &Account {
        &self.account
    }

    /// Get the current phase.
    #[must_use]
    pub const fn current_phase(&self) -> &Phase {
        &self.phase
    }

    /// All phases, oldest first.
    pub fn phases(&self) -> impl Iterator<Item = &Phase> {
        self.past_phases.iter().chain(std::iter::once(&self.phase))
    }

    /// All trades in booking order.
    pub fn trades(&self) -> impl Iterator<Item = &Trade> {
        self.past_trades.iter().chain(self.phase_trades.iter())
    }

    /// Trades of the current phase.
    #[must_use]
    pub fn phase_trades(&self) -> &[Trade] {
        &self.phase_trades
    }

    /// Recorded breaches.
    #[must_use]
    pub fn breaches(&self) -> &[Breach] {
        &self.breaches
    }

    /// Daily anchors of every phase.
    #[must_use]
    pub fn anchors(&self) -> &[DailyAnchor] {
        &self.anchors
    }

    /// Completed payouts, newest first.
    #[must_use]
    pub const fn payouts(&self) -> &PayoutHistory {
        &self.payouts
    }

    fn context(&self) -> TradeContext<'_> {
        TradeContext {
            account: &self.account,
            phase: &self.phase,
            history: &self.phase_trades,
            latest_anchor: self
                .anchors
                .iter()
                .rev()
                .find(|a| &a.phase_id == self.phase.id()),
        }
    }

    fn commit(&mut self, outcome: &TradeOutcome) {
        self.account = outcome.updated_account.clone();
        self.phase = outcome.updated_phase.clone();

        match self
            .phase_trades
            .iter_mut()
            .find(|t| t.id() == outcome.trade.id())
        {
            Some(existing) => *existing = outcome.trade.clone(),
            None => self.phase_trades.push(outcome.trade.clone()),
        }

        if let Some(anchor) = &outcome.new_anchor {
            self.anchors.push(anchor.clone());
        }
        if let Some(breach) = &outcome.breach {
            self.breaches.push(breach.clone());
        }

        if let Some(successor) = &outcome.new_phase {
            let finished = std::mem::replace(&mut self.phase, successor.clone());
            self.past_phases.push(finished);
            self.past_trades.append(&mut self.phase_trades);
        }
    }
}
