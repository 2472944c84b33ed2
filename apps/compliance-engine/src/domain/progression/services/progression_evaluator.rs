//! Phase Progression Evaluator
//!
//! Checks a phase's profit target, trading days and consistency rule.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::account_lifecycle::{Account, Phase, Trade};
use crate::domain::progression::value_objects::{ConsistencyCheck, PhaseProgress};
use crate::domain::shared::{Money, Percentage};

/// Stateless progression evaluator.
pub struct ProgressionEvaluator;

impl ProgressionEvaluator {
    /// Evaluate `phase` of `account` over its trades.
    ///
    /// Open trades are ignored. A phase advances only when the profit target,
    /// minimum trading days and consistency rule are all met. Funded phases
    /// never advance.
    #[must_use]
    pub fn evaluate(account: &Account, phase: &Phase, trades: &[Trade]) -> PhaseProgress {
        let closed: Vec<&Trade> = trades.iter().filter(|t| t.is_closed()).collect();
        let mut failure_reasons = Vec::new();

        let trading_days_complete = Self::trading_days(&closed);
        let min_trading_days_met = trading_days_complete >= phase.min_trading_days();
        let consistency = Self::consistency(account.consistency_rule(), &closed);

        if phase.phase_type().is_funded() {
            return PhaseProgress {
                phase_type: phase.phase_type(),
                profit_progress_percent: Percentage::HUNDRED,
                profit_target_met: false,
                trading_days_complete,
                min_trading_days_met,
                consistency,
                ready_to_advance: false,
                next_phase_type: None,
                failure_reasons,
            };
        }

        let net_profit = phase.net_profit_since_phase_start();
        let (profit_progress_percent, profit_target_met) =
            match phase.profit_target().filter(Money::is_positive) {
                Some(target) => {
                    let progress = Percentage::ratio(net_profit.amount(), target.amount()).clamped();
                    let met = net_profit >= target;
                    if !met {
                        failure_reasons.push(format!(
                            "profit target not reached: {net_profit} of {target}"
                        ));
                    }
                    (progress, met)
                }
                None => {
                    failure_reasons.push("profit target not configured".to_string());
                    (Percentage::ZERO, false)
                }
            };

        if !min_trading_days_met {
            failure_reasons.push(format!(
                "minimum trading days not reached: {trading_days_complete} of {}",
                phase.min_trading_days()
            ));
        }

        if let (false, Some(share), Some(rule)) =
            (consistency.met, consistency.best_day_share, consistency.rule)
        {
            failure_reasons.push(format!(
                "consistency rule violated: best day is {share} of total profit, limit {rule}"
            ));
        }

        let ready_to_advance = profit_target_met && min_trading_days_met && consistency.met;
        let next_phase_type = if ready_to_advance {
            account.evaluation_type().next_phase(phase.phase_type())
        } else {
            None
        };

        PhaseProgress {
            phase_type: phase.phase_type(),
            profit_progress_percent,
            profit_target_met,
            trading_days_complete,
            min_trading_days_met,
            consistency,
            ready_to_advance,
            next_phase_type,
            failure_reasons,
        }
    }

    /// Returns true if the phase ran past its calendar-day limit without
    /// becoming ready to advance.
    #[must_use]
    pub fn time_limit_exceeded(phase: &Phase, progress: &PhaseProgress, now: DateTime<Utc>) -> bool {
        phase.max_trading_days().is_some_and(|limit| {
            phase.calendar_days_elapsed(now) > i64::from(limit) && !progress.ready_to_advance
        })
    }

    /// Realized PnL summed per UTC exit date.
    #[must_use]
    pub fn daily_realized_pnl<'a>(
        trades: impl IntoIterator<Item = &'a Trade>,
    ) -> BTreeMap<NaiveDate, Money> {
        let mut days = BTreeMap::new();
        for trade in trades {
            if let (Some(date), Some(pnl)) = (trade.exit_date(), trade.realized_pnl()) {
                *days.entry(date).or_insert(Money::ZERO) += pnl;
            }
        }
        days
    }

    fn trading_days(closed: &[&Trade]) -> u32 {
        let dates: BTreeSet<NaiveDate> = closed.iter().map(|t| t.entry_date()).collect();
        u32::try_from(dates.len()).unwrap_or(u32::MAX)
    }

    fn consistency(rule: Option<Percentage>, closed: &[&Trade]) -> ConsistencyCheck {
        let daily = Self::daily_realized_pnl(closed.iter().copied());
        let total_profit: Money = daily.values().sum();
        let best_day_profit = daily.values().copied().max().unwrap_or(Money::ZERO);

        let best_day_share = total_profit
            .is_positive()
            .then(|| Percentage::ratio(best_day_profit.amount(), total_profit.amount()));

        let met = match (rule, best_day_share) {
            (Some(rule), Some(share)) => share <= rule,
            _ => true,
        };

        ConsistencyCheck {
            rule,
            total_profit,
            best_day_profit,
            best_day_share,
            met,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account_lifecycle::{
        BalancePolicy, DrawdownMode, DrawdownRules, EvaluationType, NewAccountParams,
        OpenTradeParams, PayoutPolicy, PhaseRules, PhaseTargets, PhaseType, RuleAmount, TradeSide,
    };
    use crate::domain::shared::{AccountId, PhaseId, TradeId};
    use chrono::{Duration, TimeZone};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    fn account(evaluation_type: EvaluationType, consistency: Option<Decimal>) -> Account {
        Account::new(NewAccountParams {
            id: AccountId::new("acc-1"),
            name: "Eval".to_string(),
            prop_firm: "FTMO".to_string(),
            starting_balance: Money::new(dec!(100000)),
            evaluation_type,
            drawdown: DrawdownRules::new(
                RuleAmount::percent(dec!(5)),
                RuleAmount::percent(dec!(10)),
                DrawdownMode::Static,
            ),
            phase_rules: PhaseRules {
                phase_1: PhaseTargets {
                    profit_target: RuleAmount::fixed(dec!(8000)),
                    min_trading_days: 5,
                    max_trading_days: Some(30),
                },
                phase_2: Some(PhaseTargets {
                    profit_target: RuleAmount::fixed(dec!(5000)),
                    min_trading_days: 5,
                    max_trading_days: Some(60),
                }),
                funded_min_trading_days: 0,
            },
            consistency_rule: consistency.map(Percentage::new),
            payout: PayoutPolicy {
                initial_profit_split: Percentage::new(dec!(80)),
                split_increment_per_payout: Percentage::ZERO,
                max_profit_split: Percentage::new(dec!(80)),
                payout_cycle_days: 14,
                min_days_to_first_payout: 0,
                min_profit: Money::ZERO,
                max_payout_amount: None,
                balance_policy: BalancePolicy::Unchanged,
            },
            created_at: start(),
        })
        .unwrap()
    }

    fn trade(n: u32, day_offset: i64, pnl: Decimal) -> Trade {
        let at = start() + Duration::days(day_offset);
        Trade::closed(
            OpenTradeParams {
                id: TradeId::new(format!("t-{n}")),
                phase_id: PhaseId::new("ph-1"),
                symbol: "EURUSD".to_string(),
                side: TradeSide::Long,
                quantity: Decimal::ONE,
                entry_price: dec!(10000),
                fees: Money::ZERO,
                commission: Money::ZERO,
                entry_at: at,
            },
            dec!(10000) + pnl,
            at + Duration::hours(1),
        )
    }

    fn phase_with(account: &Account, trades: &[Trade]) -> Phase {
        let mut phase = account.start(Some("MT5-1".to_string()), start());
        for t in trades {
            phase.record_closed_trade(t.realized_pnl().unwrap(), t.total_fees());
        }
        phase
    }

    fn five_even_days() -> Vec<Trade> {
        (0..5).map(|d| trade(d, i64::from(d), dec!(1600))).collect()
    }

    #[test]
    fn ready_when_all_objectives_met() {
        let account = account(EvaluationType::TwoStep, Some(dec!(50)));
        let trades = five_even_days();
        let phase = phase_with(&account, &trades);

        let progress = ProgressionEvaluator::evaluate(&account, &phase, &trades);

        assert_eq!(phase.net_profit_since_phase_start(), Money::new(dec!(8000)));
        assert_eq!(progress.profit_progress_percent, Percentage::HUNDRED);
        assert_eq!(progress.trading_days_complete, 5);
        assert!(progress.min_trading_days_met);
        assert!(progress.consistency_met());
        assert!(progress.ready_to_advance);
        assert_eq!(progress.next_phase_type, Some(PhaseType::Phase2));
        assert!(progress.failure_reasons.is_empty());
    }

    #[test]
    fn one_step_advances_to_funded() {
        let account = account(EvaluationType::OneStep, None);
        let trades = five_even_days();
        let phase = phase_with(&account, &trades);

        let progress = ProgressionEvaluator::evaluate(&account, &phase, &trades);
        assert_eq!(progress.next_phase_type, Some(PhaseType::Funded));
    }

    #[test]
    fn one_big_day_violates_consistency() {
        let account = account(EvaluationType::TwoStep, Some(dec!(50)));
        let mut trades: Vec<Trade> = (0..4).map(|d| trade(d, i64::from(d), dec!(500))).collect();
        trades.push(trade(9, 4, dec!(6000)));
        let phase = phase_with(&account, &trades);

        let progress = ProgressionEvaluator::evaluate(&account, &phase, &trades);

        assert!(progress.profit_target_met);
        assert!(!progress.consistency_met());
        assert_eq!(
            progress.consistency.best_day_share,
            Some(Percentage::new(dec!(75)))
        );
        assert!(!progress.ready_to_advance);
        assert_eq!(progress.next_phase_type, None);
        assert!(progress.failure_reasons[0].contains("consistency"));
    }

    #[test]
    fn losing_history_satisfies_consistency() {
        let account = account(EvaluationType::TwoStep, Some(dec!(30)));
        let trades = vec![trade(1, 0, dec!(-200)), trade(2, 1, dec!(100))];
        let phase = phase_with(&account, &trades);

        let progress = ProgressionEvaluator::evaluate(&account, &phase, &trades);
        assert!(progress.consistency_met());
        assert_eq!(progress.profit_progress_percent, Percentage::ZERO);
        assert_eq!(progress.failure_reasons.len(), 2);
    }

    #[test]
    fn trading_days_count_distinct_entry_dates() {
        let account = account(EvaluationType::TwoStep, None);
        let trades = vec![
            trade(1, 0, dec!(10)),
            trade(2, 0, dec!(10)),
            trade(3, 2, dec!(10)),
        ];
        let phase = phase_with(&account, &trades);

        let progress = ProgressionEvaluator::evaluate(&account, &phase, &trades);
        assert_eq!(progress.trading_days_complete, 2);
        assert!(!progress.min_trading_days_met);
    }

    #[test]
    fn funded_phase_never_advances() {
        let account = account(EvaluationType::OneStep, None);
        let phase = account.open_phase(PhaseType::Funded, Money::new(dec!(100000)), None, start());
        let trades = five_even_days();

        let progress = ProgressionEvaluator::evaluate(&account, &phase, &trades);
        assert_eq!(progress.profit_progress_percent, Percentage::HUNDRED);
        assert!(!progress.ready_to_advance);
        assert_eq!(progress.next_phase_type, None);
    }

    #[test]
    fn time_limit_exceeded_only_when_not_ready() {
        let account = account(EvaluationType::TwoStep, None);
        let phase = phase_with(&account, &[]);
        let progress = ProgressionEvaluator::evaluate(&account, &phase, &[]);

        assert!(!ProgressionEvaluator::time_limit_exceeded(
            &phase,
            &progress,
            start() + Duration::days(30)
        ));
        assert!(ProgressionEvaluator::time_limit_exceeded(
            &phase,
            &progress,
            start() + Duration::days(31)
        ));

        let ready = PhaseProgress {
            ready_to_advance: true,
            ..progress
        };
        assert!(!ProgressionEvaluator::time_limit_exceeded(
            &phase,
            &ready,
            start() + Duration::days(31)
        ));
    }
}
