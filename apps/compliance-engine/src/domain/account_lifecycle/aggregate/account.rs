//! Account Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::phase::{OpenPhaseParams, Phase};
use crate::domain::account_lifecycle::errors::LifecycleError;
use crate::domain::account_lifecycle::services::AccountStatusMachine;
use crate::domain::account_lifecycle::value_objects::{
    AccountStatus, DrawdownRules, EvaluationType, PayoutPolicy, PhaseRules, PhaseType,
};
use crate::domain::shared::{AccountId, DomainError, Money, Percentage, PhaseId};

/// Parameters for creating an account.
#[derive(Debug, Clone)]
pub struct NewAccountParams {
    /// Account identifier.
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Prop firm offering the challenge.
    pub prop_firm: String,
    /// Balance the challenge starts with.
    pub starting_balance: Money,
    /// Number of evaluation phases.
    pub evaluation_type: EvaluationType,
    /// Drawdown limits.
    pub drawdown: DrawdownRules,
    /// Per-phase objectives.
    pub phase_rules: PhaseRules,
    /// Maximum share of total profit allowed from one day.
    pub consistency_rule: Option<Percentage>,
    /// Payout rules.
    pub payout: PayoutPolicy,
    /// Purchase time.
    pub created_at: DateTime<Utc>,
}

impl NewAccountParams {
    /// Validate the parameters.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidValue` for a blank ID or a non-positive
    /// starting balance, and `DomainError::BusinessRuleViolation` when a
    /// two-step account has no phase 2 objectives.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.is_blank() {
            return Err(DomainError::InvalidValue {
                field: "id".to_string(),
                message: "account ID cannot be empty".to_string(),
            });
        }

        if !self.starting_balance.is_positive() {
            return Err(DomainError::InvalidValue {
                field: "starting_balance".to_string(),
                message: format!("must be positive, got {}", self.starting_balance),
            });
        }

        if self.evaluation_type == EvaluationType::TwoStep && self.phase_rules.phase_2.is_none() {
            return Err(DomainError::BusinessRuleViolation {
                rule: "TWO_STEP_REQUIRES_PHASE_2".to_string(),
                message: format!("account {} is two_step but has no phase 2 rules", self.id),
            });
        }

        Ok(())
    }
}

/// Account Aggregate Root.
///
/// One purchased challenge. Its status only moves toward `failed` or
/// `funded`; see [`AccountStatusMachine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    name: String,
    prop_firm: String,
    starting_balance: Money,
    evaluation_type: EvaluationType,
    drawdown: DrawdownRules,
    phase_rules: PhaseRules,
    consistency_rule: Option<Percentage>,
    payout: PayoutPolicy,
    status: AccountStatus,
    created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new, active account.
    ///
    /// # Errors
    ///
    /// Returns error if parameter validation fails.
    pub fn new(params: NewAccountParams) -> Result<Self, DomainError> {
        Self::reconstitute(params, AccountStatus::Active)
    }

    /// Rebuild an account from storage with its persisted status.
    ///
    /// # Errors
    ///
    /// Returns error if parameter validation fails.
    pub fn reconstitute(
        params: NewAccountParams,
        status: AccountStatus,
    ) -> Result<Self, DomainError> {
        params.validate()?;

        Ok(Self {
            id: params.id,
            name: params.name,
            prop_firm: params.prop_firm,
            starting_balance: params.starting_balance,
            evaluation_type: params.evaluation_type,
            drawdown: params.drawdown,
            phase_rules: params.phase_rules,
            consistency_rule: params.consistency_rule,
            payout: params.payout,
            status,
            created_at: params.created_at,
        })
    }

    /// Open the first evaluation phase at the starting balance.
    #[must_use]
    pub fn start(&self, external_id: Option<String>, now: DateTime<Utc>) -> Phase {
        self.open_phase(PhaseType::Phase1, self.starting_balance, external_id, now)
    }

    /// Open a phase of `phase_type` starting at `starting_balance`.
    ///
    /// The profit target is resolved against `starting_balance`; funded
    /// phases never get one.
    #[must_use]
    pub fn open_phase(
        &self,
        phase_type: PhaseType,
        starting_balance: Money,
        external_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Phase {
        let targets = self.phase_rules.targets_for(phase_type);

        Phase::open(OpenPhaseParams {
            id: PhaseId::generate(),
            account_id: self.id.clone(),
            external_id,
            phase_type,
            starting_balance,
            profit_target: targets.and_then(|t| t.profit_target.resolve(starting_balance)),
            min_trading_days: targets.map_or(self.phase_rules.funded_min_trading_days, |t| {
                t.min_trading_days
            }),
            max_trading_days: targets.and_then(|t| t.max_trading_days),
            started_at: now,
        })
    }

    /// Move the account to `to`.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::InvalidAccountTransition` if the move is not allowed.
    pub fn transition_to(&mut self, to: AccountStatus) -> Result<(), LifecycleError> {
        AccountStatusMachine::validate_transition(self.status, to)?;
        self.status = to;
        Ok(())
    }

    /// Get the account ID.
    #[must_use]
    pub const fn id(&self) -> &AccountId {
        &self.id
    }

    /// Get the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the prop firm name.
    #[must_use]
    pub fn prop_firm(&self) -> &str {
        &self.prop_firm
    }

    /// Get the starting balance.
    #[must_use]
    pub const fn starting_balance(&self) -> Money {
        self.starting_balance
    }

    /// Get the evaluation type.
    #[must_use]
    pub const fn evaluation_type(&self) -> EvaluationType {
        self.evaluation_type
    }

    /// Get the drawdown rules.
    #[must_use]
    pub const fn drawdown(&self) -> &DrawdownRules {
        &self.drawdown
    }

    /// Get the per-phase objectives.
    #[must_use]
    pub const fn phase_rules(&self) -> &PhaseRules {
        &self.phase_rules
    }

    /// Get the consistency rule, if any.
    #[must_use]
    pub const fn consistency_rule(&self) -> Option<Percentage> {
        self.consistency_rule
    }

    /// Get the payout rules.
    #[must_use]
    pub const fn payout(&self) -> &PayoutPolicy {
        &self.payout
    }

    /// Get the current status.
    #[must_use]
    pub const fn status(&self) -> AccountStatus {
        self.status
    }

    /// Get the purchase time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns true if the account has failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.status == AccountStatus::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account_lifecycle::value_objects::{
        BalancePolicy, DrawdownMode, PhaseStatus, PhaseTargets, RuleAmount,
    };
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap()
    }

    fn params(evaluation_type: EvaluationType) -> NewAccountParams {
        NewAccountParams {
            id: AccountId::new("acc-1"),
            name: "Main".to_string(),
            prop_firm: "Apex".to_string(),
            starting_balance: Money::new(dec!(100000)),
            evaluation_type,
            drawdown: DrawdownRules::new(
                RuleAmount::percent(dec!(5)),
                RuleAmount::percent(dec!(10)),
                DrawdownMode::Static,
            ),
            phase_rules: PhaseRules {
                phase_1: PhaseTargets {
                    profit_target: RuleAmount::percent(dec!(8)),
                    min_trading_days: 4,
                    max_trading_days: Some(30),
                },
                phase_2: Some(PhaseTargets {
                    profit_target: RuleAmount::percent(dec!(5)),
                    min_trading_days: 4,
                    max_trading_days: None,
                }),
                funded_min_trading_days: 0,
            },
            consistency_rule: None,
            payout: PayoutPolicy {
                initial_profit_split: Percentage::new(dec!(80)),
                split_increment_per_payout: Percentage::ZERO,
                max_profit_split: Percentage::new(dec!(90)),
                payout_cycle_days: 14,
                min_days_to_first_payout: 0,
                min_profit: Money::ZERO,
                max_payout_amount: None,
                balance_policy: BalancePolicy::Unchanged,
            },
            created_at: now(),
        }
    }

    #[test]
    fn start_opens_active_phase_one() {
        let account = Account::new(params(EvaluationType::TwoStep)).unwrap();
        let phase = account.start(Some("MT5-1".to_string()), now());

        assert_eq!(phase.phase_type(), PhaseType::Phase1);
        assert_eq!(phase.status(), PhaseStatus::Active);
        assert_eq!(phase.profit_target(), Some(Money::new(dec!(8000))));
        assert_eq!(phase.min_trading_days(), 4);
        assert_eq!(phase.max_trading_days(), Some(30));
        assert_eq!(phase.account_id(), account.id());
    }

    #[test]
    fn funded_phase_has_no_target() {
        let account = Account::new(params(EvaluationType::OneStep)).unwrap();
        let phase = account.open_phase(
            PhaseType::Funded,
            Money::new(dec!(108000)),
            None,
            now(),
        );
        assert_eq!(phase.profit_target(), None);
        assert_eq!(phase.max_trading_days(), None);
    }

    #[test]
    fn two_step_requires_phase_two() {
        let mut p = params(EvaluationType::TwoStep);
        p.phase_rules.phase_2 = None;
        assert!(matches!(
            Account::new(p),
            Err(DomainError::BusinessRuleViolation { .. })
        ));
    }

    #[test]
    fn non_positive_balance_rejected() {
        let mut p = params(EvaluationType::OneStep);
        p.starting_balance = Money::ZERO;
        assert!(matches!(
            Account::new(p),
            Err(DomainError::InvalidValue { .. })
        ));
    }

    #[test]
    fn failed_account_cannot_reactivate() {
        let mut account = Account::new(params(EvaluationType::OneStep)).unwrap();
        account.transition_to(AccountStatus::Failed).unwrap();
        assert!(account.is_failed());
        assert!(account.transition_to(AccountStatus::Active).is_err());
        assert!(account.transition_to(AccountStatus::Funded).is_err());
    }
}
