//! Replay Scenario Use Case
//!
//! Rebuilds an account from a recorded event list and reports where it
//! ended up. Rejected events are reported and skipped; only invariant
//! violations abort the replay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::dto::{ScenarioAccount, ScenarioDto, ScenarioEvent};
use crate::application::use_cases::account_ledger::AccountLedger;
use crate::application::use_cases::process_trade::TradeOutcome;
use crate::config::{AccountTemplate, Config};
use crate::domain::account_lifecycle::{Account, Breach, Payout, Phase};
use crate::domain::drawdown::DrawdownAudit;
use crate::domain::payout::PayoutEligibility;
use crate::domain::performance::RiskMetrics;
use crate::domain::shared::{AccountId, Money};
use crate::error::{EngineError, ErrorResponse};

/// Result of one replayed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum EventResult {
    /// Trade booked.
    Trade {
        /// Position in the event list.
        index: usize,
        /// What the trade produced.
        outcome: Box<TradeOutcome>,
    },
    /// Payout settled.
    Payout {
        /// Position in the event list.
        index: usize,
        /// Recorded payout.
        payout: Payout,
    },
    /// Event refused; state unchanged.
    Rejected {
        /// Position in the event list.
        index: usize,
        /// Why the event was refused.
        error: ErrorResponse,
    },
}

/// Final state of a replayed account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Account after the last event.
    pub account: Account,
    /// All phases, oldest first.
    pub phases: Vec<Phase>,
    /// Per-event results in input order.
    pub events: Vec<EventResult>,
    /// Recorded breaches.
    pub breaches: Vec<Breach>,
    /// Completed payouts, newest first.
    pub payouts: Vec<Payout>,
    /// Sum of all payouts.
    pub total_paid: Money,
    /// Trade statistics over the whole account.
    pub risk_metrics: RiskMetrics,
    /// Day-by-day drawdown replay.
    pub drawdown_audit: DrawdownAudit,
    /// Payout eligibility at the evaluation time.
    pub payout_eligibility: PayoutEligibility,
    /// Time eligibility was evaluated at.
    pub evaluated_at: DateTime<Utc>,
}

/// Use case for replaying a recorded scenario.
pub struct ReplayScenarioUseCase;

impl ReplayScenarioUseCase {
    /// Replay `scenario` with the engine settings of `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the account cannot be created or an event hits an
    /// invariant violation. Validation failures of single events are
    /// reported in the result instead.
    pub fn run(config: &Config, scenario: &ScenarioDto) -> Result<ScenarioReport, EngineError> {
        let id = scenario
            .account_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .map_or_else(AccountId::generate, AccountId::new);

        let (account, phase) = match &scenario.source {
            ScenarioAccount::Template { template } => config.instantiate_template(
                template,
                id,
                scenario.external_id.clone(),
                scenario.created_at,
            )?,
            ScenarioAccount::Inline { account, name } => AccountTemplate {
                name: name.clone().unwrap_or_else(|| id.to_string()),
                account: account.clone(),
            }
            .instantiate(
                id,
                scenario.external_id.clone(),
                scenario.created_at,
                &config.payout.defaults(),
                config.engine.default_consistency_rule(),
            )?,
        };

        let window = config.engine.recent_breach_window();
        let mut ledger = AccountLedger::new(account, phase);
        let mut events = Vec::with_capacity(scenario.events.len());

        for (index, event) in scenario.events.iter().enumerate() {
            let now = event.occurred_at();
            let result = match event {
                ScenarioEvent::Trade(input) => ledger
                    .apply_trade(input, now)
                    .map(|outcome| EventResult::Trade {
                        index,
                        outcome: Box::new(outcome),
                    }),
                ScenarioEvent::Close {
                    trade_id,
                    exit_price,
                    exit_time,
                } => ledger
                    .close_trade(trade_id, *exit_price, *exit_time, now)
                    .map(|outcome| EventResult::Trade {
                        index,
                        outcome: Box::new(outcome),
                    }),
                ScenarioEvent::Payout { amount, .. } => {
                    let amount = amount.map(|a| Money::sanitized(Some(a), Money::ZERO));
                    ledger
                        .request_payout(amount, now, window)
                        .map(|payout| EventResult::Payout { index, payout })
                }
            };

            match result {
                Ok(result) => events.push(result),
                Err(err) if err.code().is_fatal() => return Err(err),
                Err(err) => {
                    tracing::warn!(
                        account_id = %ledger.account().id(),
                        index,
                        code = %err.code(),
                        error = %err,
                        "Scenario event rejected"
                    );
                    events.push(EventResult::Rejected {
                        index,
                        error: err.to_response(),
                    });
                }
            }
        }

        let evaluated_at = scenario
            .evaluate_at
            .or_else(|| scenario.events.last().map(ScenarioEvent::occurred_at))
            .unwrap_or(scenario.created_at);

        let report = ScenarioReport {
            account: ledger.account().clone(),
            phases: ledger.phases().cloned().collect(),
            events,
            breaches: ledger.breaches().to_vec(),
            payouts: ledger.payouts().iter().cloned().collect(),
            total_paid: ledger.payouts().total_paid(),
            risk_metrics: ledger.risk_metrics(config.engine.profit_factor_cap()),
            drawdown_audit: ledger.drawdown_audit(),
            payout_eligibility: ledger.payout_eligibility(evaluated_at, window),
            evaluated_at,
        };

        tracing::info!(
            account_id = %report.account.id(),
            status = %report.account.status(),
            phases = report.phases.len(),
            trades = report.risk_metrics.total_trades,
            breaches = report.breaches.len(),
            "Scenario replayed"
        );

        Ok(report)
    }
}
