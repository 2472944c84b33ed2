//! Payout Settlement
//!
//! Applies an executed payout to the funded phase.

use chrono::{DateTime, Utc};

use crate::domain::account_lifecycle::{Account, Payout, PayoutHistory, Phase};
use crate::domain::payout::errors::PayoutError;
use crate::domain::payout::value_objects::PayoutEligibility;
use crate::domain::shared::{Money, PayoutId};

/// Records payouts and applies the account's balance policy.
pub struct PayoutSettlement;

impl PayoutSettlement {
    /// Settle a payout of `amount` against a prior eligibility check.
    ///
    /// On success the payout is prepended to `history` and the phase's
    /// balance and payout baseline are moved per the account's policy.
    ///
    /// # Errors
    ///
    /// Returns `PayoutError::NotEligible` if the check reported blockers and
    /// `PayoutError::InvalidAmount` if `amount` is not positive or exceeds
    /// the eligible amount. Nothing changes on error.
    pub fn settle(
        account: &Account,
        phase: &mut Phase,
        history: &mut PayoutHistory,
        eligibility: &PayoutEligibility,
        amount: Money,
        now: DateTime<Utc>,
    ) -> Result<Payout, PayoutError> {
        if !eligibility.is_eligible {
            return Err(PayoutError::NotEligible {
                phase_id: phase.id().clone(),
                blockers: eligibility.blockers.clone(),
            });
        }

        if !amount.is_positive() || amount > eligibility.eligible_amount {
            return Err(PayoutError::InvalidAmount {
                requested: amount,
                eligible: eligibility.eligible_amount,
            });
        }

        let payout = Payout {
            id: PayoutId::generate(),
            account_id: account.id().clone(),
            phase_id: phase.id().clone(),
            amount,
            profit_split: eligibility.profit_split_percent,
            created_at: now,
        };

        let policy = account.payout().balance_policy;
        phase.rebase_after_payout(policy, amount);
        history.record(payout.clone());

        tracing::info!(
            account_id = %account.id(),
            phase_id = %phase.id(),
            amount = %amount,
            profit_split = %eligibility.profit_split_percent,
            balance = %phase.current_balance(),
            "Payout settled"
        );

        Ok(payout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account_lifecycle::{
        BalancePolicy, DrawdownMode, DrawdownRules, EvaluationType, NewAccountParams,
        PayoutPolicy, PhaseRules, PhaseTargets, PhaseType, RuleAmount,
    };
    use crate::domain::payout::PayoutCalculator;
    use crate::domain::shared::{AccountId, Percentage};
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap()
    }

    fn account(balance_policy: BalancePolicy) -> Account {
        Account::new(NewAccountParams {
            id: AccountId::new("acc-1"),
            name: "Funded".to_string(),
            prop_firm: "Topstep".to_string(),
            starting_balance: Money::new(dec!(50000)),
            evaluation_type: EvaluationType::OneStep,
            drawdown: DrawdownRules::new(
                RuleAmount::disabled(),
                RuleAmount::fixed(dec!(2000)),
                DrawdownMode::Trailing,
            ),
            phase_rules: PhaseRules {
                phase_1: PhaseTargets {
                    profit_target: RuleAmount::fixed(dec!(3000)),
                    min_trading_days: 2,
                    max_trading_days: None,
                },
                phase_2: None,
                funded_min_trading_days: 0,
            },
            consistency_rule: None,
            payout: PayoutPolicy {
                initial_profit_split: Percentage::new(dec!(90)),
                split_increment_per_payout: Percentage::ZERO,
                max_profit_split: Percentage::new(dec!(90)),
                payout_cycle_days: 7,
                min_days_to_first_payout: 0,
                min_profit: Money::new(dec!(250)),
                max_payout_amount: None,
                balance_policy,
            },
            created_at: now(),
        })
        .unwrap()
    }

    fn funded(account: &Account) -> Phase {
        let mut phase = account.open_phase(
            PhaseType::Funded,
            Money::new(dec!(50000)),
            Some("R-77".to_string()),
            now() - Duration::days(20),
        );
        phase.record_closed_trade(Money::new(dec!(1200)), Money::ZERO);
        phase
    }

    #[test]
    fn settle_reduces_balance_and_escalation_counts() {
        let account = account(BalancePolicy::ReduceByPayout);
        let mut phase = funded(&account);
        let mut history = PayoutHistory::empty();

        let eligibility =
            PayoutCalculator::evaluate(account.payout(), &phase, &history, false, now());
        let payout = PayoutSettlement::settle(
            &account,
            &mut phase,
            &mut history,
            &eligibility,
            eligibility.eligible_amount,
            now(),
        )
        .unwrap();

        assert_eq!(payout.amount, Money::new(dec!(1200)));
        assert_eq!(history.len(), 1);
        assert_eq!(phase.current_balance(), Money::new(dec!(50000)));
        assert_eq!(phase.net_profit_since_last_payout(), Money::ZERO);

        let again = PayoutCalculator::evaluate(account.payout(), &phase, &history, false, now());
        assert!(!again.is_eligible);
        assert_eq!(again.eligible_amount, Money::ZERO);
    }

    #[test]
    fn unchanged_policy_still_moves_baseline() {
        let account = account(BalancePolicy::Unchanged);
        let mut phase = funded(&account);
        let mut history = PayoutHistory::empty();

        let eligibility =
            PayoutCalculator::evaluate(account.payout(), &phase, &history, false, now());
        PayoutSettlement::settle(
            &account,
            &mut phase,
            &mut history,
            &eligibility,
            Money::new(dec!(1000)),
            now(),
        )
        .unwrap();

        assert_eq!(phase.current_balance(), Money::new(dec!(51200)));
        assert_eq!(phase.net_profit_since_last_payout(), Money::new(dec!(200)));
    }

    #[test]
    fn amount_above_eligible_is_rejected() {
        let account = account(BalancePolicy::ReduceByPayout);
        let mut phase = funded(&account);
        let before = phase.clone();
        let mut history = PayoutHistory::empty();

        let eligibility =
            PayoutCalculator::evaluate(account.payout(), &phase, &history, false, now());
        let err = PayoutSettlement::settle(
            &account,
            &mut phase,
            &mut history,
            &eligibility,
            Money::new(dec!(5000)),
            now(),
        )
        .unwrap_err();

        assert!(matches!(err, PayoutError::InvalidAmount { .. }));
        assert_eq!(phase, before);
        assert!(history.is_empty());
    }

    #[test]
    fn blocked_eligibility_is_rejected() {
        let account = account(BalancePolicy::ReduceByPayout);
        let mut phase = funded(&account);
        let mut history = PayoutHistory::empty();

        let eligibility =
            PayoutCalculator::evaluate(account.payout(), &phase, &history, true, now());
        let err = PayoutSettlement::settle(
            &account,
            &mut phase,
            &mut history,
            &eligibility,
            Money::new(dec!(100)),
            now(),
        )
        .unwrap_err();

        assert!(matches!(err, PayoutError::NotEligible { .. }));
        assert!(err.to_string().contains("RECENT_BREACH"));
    }
}
