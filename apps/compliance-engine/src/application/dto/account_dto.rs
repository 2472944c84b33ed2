//! Account configuration DTO.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::account_lifecycle::{
    AmountKind, BalancePolicy, DrawdownMode, DrawdownRules, EvaluationType, NewAccountParams,
    PayoutPolicy, PhaseRules, PhaseTargets, RuleAmount,
};
use crate::domain::shared::numeric_guard::{sanitize_days, sanitize_decimal};
use crate::domain::shared::{AccountId, Money, Percentage};

/// Split defaults applied when an account omits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayoutDefaults {
    /// Trader split for the first payout.
    pub initial_profit_split: Percentage,
    /// Split added per completed payout.
    pub split_increment_per_payout: Percentage,
    /// Upper bound of the split.
    pub max_profit_split: Percentage,
    /// Days between payouts.
    pub payout_cycle_days: u32,
}

/// Objectives of one evaluation phase, as configured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseTargetsDto {
    /// Profit target amount.
    #[serde(default)]
    pub profit_target: Option<f64>,
    /// Interpretation of `profit_target`.
    #[serde(default)]
    pub profit_target_type: AmountKind,
    /// Minimum distinct trading days.
    #[serde(default)]
    pub min_trading_days: Option<f64>,
    /// Calendar-day limit; absent or non-positive means none.
    #[serde(default)]
    pub max_trading_days: Option<f64>,
}

impl PhaseTargetsDto {
    /// Sanitized phase targets.
    #[must_use]
    pub fn to_targets(&self) -> PhaseTargets {
        PhaseTargets {
            profit_target: rule_amount(self.profit_target, self.profit_target_type),
            min_trading_days: sanitize_days(self.min_trading_days, 0),
            max_trading_days: Some(sanitize_days(self.max_trading_days, 0)).filter(|d| *d > 0),
        }
    }
}

/// Account configuration as stored or imported.
///
/// Mirrors the flat record shape used by the surrounding product; every
/// number is optional and defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountConfigDto {
    /// Prop firm name.
    #[serde(default)]
    pub prop_firm: String,
    /// Starting balance.
    #[serde(default)]
    pub starting_balance: Option<f64>,
    /// Evaluation type.
    pub evaluation_type: EvaluationType,
    /// Daily drawdown amount.
    #[serde(default)]
    pub daily_drawdown_amount: Option<f64>,
    /// Daily drawdown interpretation.
    #[serde(default)]
    pub daily_drawdown_type: AmountKind,
    /// Max drawdown amount.
    #[serde(default)]
    pub max_drawdown_amount: Option<f64>,
    /// Max drawdown interpretation.
    #[serde(default)]
    pub max_drawdown_type: AmountKind,
    /// Max drawdown baseline.
    #[serde(default = "default_mode")]
    pub drawdown_mode: DrawdownMode,
    /// Consistency rule percent; absent or non-positive means none.
    #[serde(default)]
    pub consistency_rule: Option<f64>,
    /// Phase 1 objectives.
    #[serde(default)]
    pub phase_1: PhaseTargetsDto,
    /// Phase 2 objectives (two-step only).
    #[serde(default)]
    pub phase_2: Option<PhaseTargetsDto>,
    /// Minimum trading days tracked on the funded phase.
    #[serde(default)]
    pub funded_min_trading_days: Option<f64>,
    /// Initial trader split.
    #[serde(default)]
    pub profit_split_percent: Option<f64>,
    /// Split added per payout.
    #[serde(default)]
    pub split_increment_per_payout: Option<f64>,
    /// Maximum trader split.
    #[serde(default)]
    pub max_profit_split: Option<f64>,
    /// Days between payouts.
    #[serde(default)]
    pub payout_cycle_days: Option<f64>,
    /// Days after funding before the first payout.
    #[serde(default)]
    pub min_days_to_first_payout: Option<f64>,
    /// Minimum profit since the last payout.
    #[serde(default)]
    pub payout_eligibility_min_profit: Option<f64>,
    /// Cap on a single payout.
    #[serde(default)]
    pub max_payout_amount: Option<f64>,
    /// Reset balance after a payout.
    #[serde(default)]
    pub reset_on_payout: bool,
    /// Subtract the payout from the balance.
    #[serde(default)]
    pub reduce_balance_by_payout: bool,
    /// Balance after a reset; defaults to the starting balance.
    #[serde(default)]
    pub reset_balance: Option<f64>,
}

const fn default_mode() -> DrawdownMode {
    DrawdownMode::Static
}

fn rule_amount(amount: Option<f64>, kind: AmountKind) -> RuleAmount {
    RuleAmount {
        amount: sanitize_decimal(amount, Decimal::ZERO),
        kind,
    }
}

fn optional_positive(value: Option<f64>) -> Option<Decimal> {
    Some(sanitize_decimal(value, Decimal::ZERO)).filter(|v| *v > Decimal::ZERO)
}

impl AccountConfigDto {
    /// Sanitized account parameters.
    ///
    /// Validation of the result happens in `Account::new`.
    #[must_use]
    pub fn to_params(
        &self,
        id: AccountId,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
        defaults: &PayoutDefaults,
    ) -> NewAccountParams {
        let starting_balance = Money::sanitized(self.starting_balance, Money::ZERO);
        let reset_balance = Money::sanitized(self.reset_balance, starting_balance);

        NewAccountParams {
            id,
            name: name.into(),
            prop_firm: self.prop_firm.clone(),
            starting_balance,
            evaluation_type: self.evaluation_type,
            drawdown: DrawdownRules::new(
                rule_amount(self.daily_drawdown_amount, self.daily_drawdown_type),
                rule_amount(self.max_drawdown_amount, self.max_drawdown_type),
                self.drawdown_mode,
            ),
            phase_rules: PhaseRules {
                phase_1: self.phase_1.to_targets(),
                phase_2: self.phase_2.as_ref().map(PhaseTargetsDto::to_targets),
                funded_min_trading_days: sanitize_days(self.funded_min_trading_days, 0),
            },
            consistency_rule: optional_positive(self.consistency_rule).map(Percentage::new),
            payout: PayoutPolicy {
                initial_profit_split: Percentage::sanitized(
                    self.profit_split_percent,
                    defaults.initial_profit_split,
                )
                .clamped(),
                split_increment_per_payout: Percentage::sanitized(
                    self.split_increment_per_payout,
                    defaults.split_increment_per_payout,
                ),
                max_profit_split: Percentage::sanitized(
                    self.max_profit_split,
                    defaults.max_profit_split,
                )
                .clamped(),
                payout_cycle_days: sanitize_days(
                    self.payout_cycle_days,
                    defaults.payout_cycle_days,
                ),
                min_days_to_first_payout: sanitize_days(self.min_days_to_first_payout, 0),
                min_profit: Money::sanitized(self.payout_eligibility_min_profit, Money::ZERO),
                max_payout_amount: optional_positive(self.max_payout_amount).map(Money::new),
                balance_policy: BalancePolicy::from_flags(
                    self.reset_on_payout,
                    self.reduce_balance_by_payout,
                    reset_balance,
                ),
            },
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn defaults() -> PayoutDefaults {
        PayoutDefaults {
            initial_profit_split: Percentage::new(dec!(80)),
            split_increment_per_payout: Percentage::ZERO,
            max_profit_split: Percentage::new(dec!(90)),
            payout_cycle_days: 14,
        }
    }

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn minimal_json_uses_defaults() {
        let dto: AccountConfigDto = serde_json::from_str(
            r#"{
                "startingBalance": 50000,
                "evaluationType": "one_step",
                "dailyDrawdownAmount": 1000,
                "dailyDrawdownType": "fixed",
                "maxDrawdownAmount": 8,
                "phase1": {"profitTarget": 6, "minTradingDays": 3}
            }"#,
        )
        .unwrap();
        let params = dto.to_params(AccountId::new("a"), "A", created(), &defaults());

        assert_eq!(params.starting_balance, Money::new(dec!(50000)));
        assert_eq!(params.drawdown.daily, RuleAmount::fixed(dec!(1000)));
        assert_eq!(params.drawdown.max, RuleAmount::percent(dec!(8)));
        assert_eq!(params.drawdown.mode, DrawdownMode::Static);
        assert_eq!(params.phase_rules.phase_1.min_trading_days, 3);
        assert_eq!(params.phase_rules.phase_1.max_trading_days, None);
        assert_eq!(params.payout.initial_profit_split, Percentage::new(dec!(80)));
        assert_eq!(params.payout.payout_cycle_days, 14);
        assert_eq!(params.payout.balance_policy, BalancePolicy::Unchanged);
        assert_eq!(params.consistency_rule, None);
    }

    #[test]
    fn missing_phase_targets_default_to_percent() {
        let dto: AccountConfigDto =
            serde_json::from_str(r#"{"startingBalance": 10000, "evaluationType": "one_step"}"#)
                .unwrap();

        assert_eq!(dto.phase_1, PhaseTargetsDto::default());
        assert_eq!(dto.phase_1.profit_target_type, AmountKind::Percent);
        assert_eq!(dto.daily_drawdown_type, AmountKind::Percent);
        let targets = dto.phase_1.to_targets();
        assert!(!targets.profit_target.is_enabled());
        assert_eq!(targets.profit_target.kind, AmountKind::Percent);
    }

    #[test]
    fn reset_balance_defaults_to_starting_balance() {
        let dto: AccountConfigDto = serde_json::from_str(
            r#"{"startingBalance": 25000, "evaluationType": "one_step", "resetOnPayout": true}"#,
        )
        .unwrap();
        let params = dto.to_params(AccountId::new("a"), "A", created(), &defaults());
        assert_eq!(
            params.payout.balance_policy,
            BalancePolicy::ResetTo {
                balance: Money::new(dec!(25000))
            }
        );
    }

    #[test]
    fn non_finite_numbers_are_absorbed() {
        let dto = AccountConfigDto {
            prop_firm: String::new(),
            starting_balance: Some(f64::NAN),
            evaluation_type: EvaluationType::OneStep,
            daily_drawdown_amount: Some(f64::INFINITY),
            daily_drawdown_type: AmountKind::Percent,
            max_drawdown_amount: None,
            max_drawdown_type: AmountKind::Percent,
            drawdown_mode: DrawdownMode::Trailing,
            consistency_rule: Some(f64::NAN),
            phase_1: PhaseTargetsDto::default(),
            phase_2: None,
            funded_min_trading_days: Some(-3.0),
            profit_split_percent: Some(f64::NEG_INFINITY),
            split_increment_per_payout: None,
            max_profit_split: None,
            payout_cycle_days: Some(f64::NAN),
            min_days_to_first_payout: None,
            payout_eligibility_min_profit: None,
            max_payout_amount: Some(0.0),
            reset_on_payout: false,
            reduce_balance_by_payout: true,
            reset_balance: None,
        };
        let params = dto.to_params(AccountId::new("a"), "A", created(), &defaults());

        assert_eq!(params.starting_balance, Money::ZERO);
        assert!(!params.drawdown.daily.is_enabled());
        assert_eq!(params.consistency_rule, None);
        assert_eq!(params.phase_rules.funded_min_trading_days, 0);
        assert_eq!(params.payout.initial_profit_split, Percentage::new(dec!(80)));
        assert_eq!(params.payout.payout_cycle_days, 14);
        assert_eq!(params.payout.max_payout_amount, None);
        assert_eq!(params.payout.balance_policy, BalancePolicy::ReduceByPayout);
    }
}
