//! Process Trade Use Case
//!
//! The single place a trade event changes phase and account state. A breach
//! always wins over advancement on the same trade.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::application::dto::TradeInputDto;
use crate::domain::account_lifecycle::{
    Account, AccountStatus, Breach, BreachType, DailyAnchor, EquitySnapshot, LifecycleError,
    Phase, PhaseType, Trade,
};
use crate::domain::drawdown::{DrawdownCalculator, DrawdownInput, DrawdownResult};
use crate::domain::progression::{PhaseProgress, ProgressionEvaluator};
use crate::domain::shared::Money;

/// State a trade is applied against.
#[derive(Debug, Clone, Copy)]
pub struct TradeContext<'a> {
    /// Owning account.
    pub account: &'a Account,
    /// Active phase the trade is booked on.
    pub phase: &'a Phase,
    /// Earlier trades of the phase, oldest first.
    pub history: &'a [Trade],
    /// Most recent daily anchor of the phase.
    pub latest_anchor: Option<&'a DailyAnchor>,
}

/// Why a phase failed while processing a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum PhaseFailure {
    /// A drawdown limit was exceeded.
    Breach {
        /// Violated limit.
        breach_type: BreachType,
    },
    /// The phase ran past its calendar-day limit without meeting its objectives.
    TimeLimitExceeded {
        /// Calendar days since the phase started.
        elapsed_days: i64,
        /// Configured limit.
        max_trading_days: u32,
    },
}

/// Account status change caused by a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatusChange {
    /// Status before the trade.
    pub from: AccountStatus,
    /// Status after the trade.
    pub to: AccountStatus,
}

/// Everything a processed trade produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOutcome {
    /// The trade as booked.
    pub trade: Trade,
    /// Account after the trade.
    pub updated_account: Account,
    /// Phase after the trade.
    pub updated_phase: Phase,
    /// Breach record, when a limit was exceeded.
    pub breach: Option<Breach>,
    /// Successor phase, when the phase passed.
    pub new_phase: Option<Phase>,
    /// Account status change, if any.
    pub account_status_change: Option<AccountStatusChange>,
    /// Failure cause, when the phase failed.
    pub phase_failure: Option<PhaseFailure>,
    /// New daily anchor, when the trade opened a new day.
    pub new_anchor: Option<DailyAnchor>,
    /// Equity history point.
    pub snapshot: EquitySnapshot,
    /// Drawdown evaluation on the updated equity.
    pub drawdown: DrawdownResult,
    /// Progression evaluation over closed trades; absent after a breach.
    pub progress: Option<PhaseProgress>,
}

/// Use case for applying trade events to a phase.
pub struct ProcessTradeUseCase;

impl ProcessTradeUseCase {
    /// Apply a trade event.
    ///
    /// # Errors
    ///
    /// Returns a `LifecycleError` when the account has failed, the phase is
    /// not active, lacks an external identifier or belongs to another
    /// account, and `DuplicateTrade` when `history` already holds the trade
    /// ID. Nothing changes on error.
    pub fn apply_trade(
        ctx: TradeContext<'_>,
        input: &TradeInputDto,
        now: DateTime<Utc>,
    ) -> Result<TradeOutcome, LifecycleError> {
        Self::check_preconditions(&ctx)?;

        let trade = input.to_trade(ctx.phase.id());
        if ctx.history.iter().any(|t| t.id() == trade.id()) {
            return Err(LifecycleError::DuplicateTrade {
                trade_id: trade.id().clone(),
            });
        }

        let unrealized = input.unrealized_pnl(&trade);
        Self::process(ctx, trade, unrealized, now)
    }

    /// Close a previously opened trade and run it through the same pipeline.
    ///
    /// `exit_price` is sanitized; a missing or non-finite price closes at the
    /// entry price.
    ///
    /// # Errors
    ///
    /// Returns the `apply_trade` errors, plus `TradePhaseMismatch` when the
    /// trade belongs to another phase and `TradeAlreadyClosed` when it was
    /// closed before.
    pub fn close_trade(
        ctx: TradeContext<'_>,
        trade: &Trade,
        exit_price: Option<f64>,
        exit_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<TradeOutcome, LifecycleError> {
        Self::check_preconditions(&ctx)?;

        if trade.phase_id() != ctx.phase.id() {
            return Err(LifecycleError::TradePhaseMismatch {
                trade_id: trade.id().clone(),
                phase_id: ctx.phase.id().clone(),
            });
        }

        let mut closed = trade.clone();
        let exit = Money::sanitized(exit_price, Money::new(trade.entry_price())).amount();
        closed.close(exit, exit_at)?;
        Self::process(ctx, closed, Money::ZERO, now)
    }

    fn check_preconditions(ctx: &TradeContext<'_>) -> Result<(), LifecycleError> {
        let account = ctx.account;
        let phase = ctx.phase;

        if account.is_failed() {
            return Err(LifecycleError::AccountFailed {
                account_id: account.id().clone(),
            });
        }

        if phase.account_id() != account.id() {
            return Err(LifecycleError::PhaseAccountMismatch {
                phase_id: phase.id().clone(),
                account_id: account.id().clone(),
            });
        }

        if !phase.is_active() {
            return Err(LifecycleError::PhaseNotActive {
                phase_id: phase.id().clone(),
                status: phase.status(),
            });
        }

        if !phase.has_valid_external_id() {
            return Err(LifecycleError::MissingExternalId {
                phase_id: phase.id().clone(),
            });
        }

        Ok(())
    }

    fn process(
        ctx: TradeContext<'_>,
        trade: Trade,
        unrealized: Money,
        now: DateTime<Utc>,
    ) -> Result<TradeOutcome, LifecycleError> {
        let mut account = ctx.account.clone();
        let mut phase = ctx.phase.clone();

        let event_at = trade.exit_at().unwrap_or_else(|| trade.entry_at());
        let (anchor, new_anchor) = Self::resolve_anchor(&phase, ctx.latest_anchor, event_at.date_naive());

        let (equity, open_pnl) = match trade.realized_pnl() {
            Some(pnl) => {
                phase.record_closed_trade(pnl, trade.total_fees());
                (phase.current_equity(), Money::ZERO)
            }
            None => (phase.current_equity() + unrealized, unrealized),
        };

        let snapshot = EquitySnapshot {
            phase_id: phase.id().clone(),
            taken_at: event_at,
            balance: phase.current_balance(),
            equity,
            open_pnl,
        };

        let drawdown = DrawdownCalculator::evaluate(
            account.drawdown(),
            &DrawdownInput::for_phase(&phase, equity, Some(&anchor), account.starting_balance()),
        );

        tracing::debug!(
            account_id = %account.id(),
            phase_id = %phase.id(),
            trade_id = %trade.id(),
            equity = %equity,
            daily_used = %drawdown.daily_used,
            max_used = %drawdown.max_used,
            "Trade processed"
        );

        let mut outcome = TradeOutcome {
            trade,
            updated_account: account.clone(),
            updated_phase: phase.clone(),
            breach: None,
            new_phase: None,
            account_status_change: None,
            phase_failure: None,
            new_anchor,
            snapshot,
            drawdown,
            progress: None,
        };

        if let (Some(breach_type), Some(amount), Some(threshold)) = (
            drawdown.breach_type,
            drawdown.breach_amount,
            drawdown.breach_threshold,
        ) {
            let breach = Breach::new(
                account.id().clone(),
                phase.id().clone(),
                breach_type,
                amount,
                threshold,
                equity,
                now,
            );
            phase.mark_failed(now)?;
            let change = Self::transition(&mut account, AccountStatus::Failed)?;

            tracing::warn!(
                account_id = %account.id(),
                phase_id = %phase.id(),
                breach_type = %breach_type,
                breach_amount = %amount,
                breach_threshold = %threshold,
                "Drawdown breach, phase failed"
            );

            outcome.breach = Some(breach);
            outcome.phase_failure = Some(PhaseFailure::Breach { breach_type });
            outcome.account_status_change = change;
            outcome.updated_account = account;
            outcome.updated_phase = phase;
            return Ok(outcome);
        }

        // Open positions never advance a phase but still run out its clock.
        let trades: Vec<Trade> = ctx
            .history
            .iter()
            .filter(|t| t.id() != outcome.trade.id())
            .cloned()
            .chain(std::iter::once(outcome.trade.clone()))
            .collect();
        let progress = ProgressionEvaluator::evaluate(&account, &phase, &trades);
        let advance_to = progress
            .next_phase_type
            .filter(|_| progress.ready_to_advance && outcome.trade.is_closed());

        if let Some(next) = advance_to {
            phase.mark_passed(now)?;
            let successor = account.open_phase(
                next,
                phase.current_equity(),
                phase.external_id().map(ToOwned::to_owned),
                now,
            );
            if next == PhaseType::Funded {
                outcome.account_status_change = Self::transition(&mut account, AccountStatus::Funded)?;
            }

            tracing::info!(
                account_id = %account.id(),
                phase_id = %phase.id(),
                next_phase = %next,
                starting_balance = %successor.starting_balance(),
                "Phase passed"
            );

            outcome.new_phase = Some(successor);
        } else if ProgressionEvaluator::time_limit_exceeded(&phase, &progress, now) {
            let elapsed_days = phase.calendar_days_elapsed(now);
            let max_trading_days = phase.max_trading_days().unwrap_or_default();
            phase.mark_failed(now)?;
            outcome.account_status_change = Self::transition(&mut account, AccountStatus::Failed)?;

            tracing::warn!(
                account_id = %account.id(),
                phase_id = %phase.id(),
                elapsed_days,
                max_trading_days,
                "Phase time limit exceeded, phase failed"
            );

            outcome.phase_failure = Some(PhaseFailure::TimeLimitExceeded {
                elapsed_days,
                max_trading_days,
            });
        }

        outcome.progress = Some(progress);
        outcome.updated_account = account;
        outcome.updated_phase = phase;
        Ok(outcome)
    }

    /// Anchor for `date`: the latest one when it covers the date, otherwise a
    /// new anchor at the phase's pre-trade equity.
    fn resolve_anchor(
        phase: &Phase,
        latest: Option<&DailyAnchor>,
        date: NaiveDate,
    ) -> (DailyAnchor, Option<DailyAnchor>) {
        match latest {
            Some(anchor) if anchor.covers(phase.id(), date) => (anchor.clone(), None),
            _ => {
                let anchor = DailyAnchor::new(phase.id().clone(), date, phase.current_equity());
                (anchor.clone(), Some(anchor))
            }
        }
    }

    fn transition(
        account: &mut Account,
        to: AccountStatus,
    ) -> Result<Option<AccountStatusChange>, LifecycleError> {
        let from = account.status();
        if from == to {
            return Ok(None);
        }
        account.transition_to(to)?;
        Ok(Some(AccountStatusChange { from, to }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account_lifecycle::{
        BalancePolicy, DrawdownMode, DrawdownRules, EvaluationType, NewAccountParams,
        PayoutPolicy, PhaseRules, PhaseStatus, PhaseTargets, RuleAmount, TradeSide,
    };
    use crate::domain::shared::{AccountId, Percentage, PhaseId, TradeId};
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 13, 0, 0).unwrap()
    }

    fn account() -> Account {
        Account::new(NewAccountParams {
            id: AccountId::new("acc-1"),
            name: "Eval".to_string(),
            prop_firm: "Maven".to_string(),
            starting_balance: Money::new(dec!(10000)),
            evaluation_type: EvaluationType::OneStep,
            drawdown: DrawdownRules::new(
                RuleAmount::fixed(dec!(500)),
                RuleAmount::percent(dec!(8)),
                DrawdownMode::Static,
            ),
            phase_rules: PhaseRules {
                phase_1: PhaseTargets {
                    profit_target: RuleAmount::fixed(dec!(400)),
                    min_trading_days: 1,
                    max_trading_days: Some(10),
                },
                phase_2: None,
                funded_min_trading_days: 0,
            },
            consistency_rule: None,
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

    fn input(entry: f64, exit: Option<f64>, at: DateTime<Utc>) -> TradeInputDto {
        TradeInputDto {
            id: None,
            symbol: "ES".to_string(),
            side: TradeSide::Long,
            quantity: Some(1.0),
            entry_price: Some(entry),
            exit_price: exit,
            fees: None,
            commission: None,
            entry_time: at,
            exit_time: exit.map(|_| at + Duration::minutes(5)),
            mark_price: None,
        }
    }

    #[test]
    fn small_win_updates_phase_and_anchors_day() {
        let account = account();
        let phase = account.start(Some("MT5-1".to_string()), start());
        let ctx = TradeContext {
            account: &account,
            phase: &phase,
            history: &[],
            latest_anchor: None,
        };

        let outcome =
            ProcessTradeUseCase::apply_trade(ctx, &input(100.0, Some(200.0), start()), start())
                .unwrap();

        assert_eq!(outcome.updated_phase.current_equity(), Money::new(dec!(10100)));
        assert_eq!(outcome.updated_phase.status(), PhaseStatus::Active);
        assert_eq!(
            outcome.new_anchor.map(|a| a.anchor_equity),
            Some(Money::new(dec!(10000)))
        );
        assert_eq!(outcome.snapshot.open_pnl, Money::ZERO);
        assert!(outcome.breach.is_none());
        assert!(outcome.new_phase.is_none());
    }

    #[test]
    fn target_reached_advances_to_funded() {
        let account = account();
        let phase = account.start(Some("MT5-1".to_string()), start());
        let ctx = TradeContext {
            account: &account,
            phase: &phase,
            history: &[],
            latest_anchor: None,
        };

        let outcome =
            ProcessTradeUseCase::apply_trade(ctx, &input(100.0, Some(500.0), start()), start())
                .unwrap();

        assert_eq!(outcome.updated_phase.status(), PhaseStatus::Passed);
        let funded = outcome.new_phase.unwrap();
        assert_eq!(funded.phase_type(), PhaseType::Funded);
        assert_eq!(funded.starting_balance(), Money::new(dec!(10400)));
        assert_eq!(funded.high_water_mark(), Money::new(dec!(10400)));
        assert_eq!(funded.external_id(), Some("MT5-1"));
        assert_eq!(outcome.updated_account.status(), AccountStatus::Funded);
        assert_eq!(
            outcome.account_status_change,
            Some(AccountStatusChange {
                from: AccountStatus::Active,
                to: AccountStatus::Funded
            })
        );
    }

    #[test]
    fn open_position_breach_uses_unrealized_pnl() {
        let account = account();
        let phase = account.start(Some("MT5-1".to_string()), start());
        let ctx = TradeContext {
            account: &account,
            phase: &phase,
            history: &[],
            latest_anchor: None,
        };
        let mut open = input(1000.0, None, start());
        open.mark_price = Some(400.0);

        let outcome = ProcessTradeUseCase::apply_trade(ctx, &open, start()).unwrap();

        assert!(!outcome.trade.is_closed());
        assert_eq!(outcome.snapshot.open_pnl, Money::new(dec!(-600)));
        assert_eq!(outcome.updated_phase.current_balance(), Money::new(dec!(10000)));
        let breach = outcome.breach.unwrap();
        assert_eq!(breach.breach_type(), BreachType::DailyDrawdown);
        assert_eq!(breach.equity_at_breach(), Money::new(dec!(9400)));
        assert_eq!(outcome.updated_phase.status(), PhaseStatus::Failed);
        assert_eq!(outcome.updated_account.status(), AccountStatus::Failed);
    }

    #[test]
    fn existing_anchor_for_same_day_is_reused() {
        let account = account();
        let phase = account.start(Some("MT5-1".to_string()), start());
        let anchor = DailyAnchor::new(
            phase.id().clone(),
            start().date_naive(),
            Money::new(dec!(10300)),
        );
        let ctx = TradeContext {
            account: &account,
            phase: &phase,
            history: &[],
            latest_anchor: Some(&anchor),
        };

        // 10300 anchor, equity drops to 9700: daily used 600 > 500
        let outcome =
            ProcessTradeUseCase::apply_trade(ctx, &input(500.0, Some(200.0), start()), start())
                .unwrap();

        assert!(outcome.new_anchor.is_none());
        assert_eq!(outcome.drawdown.daily_used, Money::new(dec!(600)));
        assert!(outcome.drawdown.is_breached);
    }

    #[test]
    fn time_limit_fails_phase_without_breach() {
        let account = account();
        let phase = account.start(Some("MT5-1".to_string()), start());
        let later = start() + Duration::days(11);
        let ctx = TradeContext {
            account: &account,
            phase: &phase,
            history: &[],
            latest_anchor: None,
        };

        let outcome =
            ProcessTradeUseCase::apply_trade(ctx, &input(100.0, Some(110.0), later), later)
                .unwrap();

        assert!(outcome.breach.is_none());
        assert_eq!(
            outcome.phase_failure,
            Some(PhaseFailure::TimeLimitExceeded {
                elapsed_days: 11,
                max_trading_days: 10
            })
        );
        assert_eq!(outcome.updated_phase.status(), PhaseStatus::Failed);
        assert_eq!(outcome.updated_account.status(), AccountStatus::Failed);
    }

    #[test]
    fn open_position_past_time_limit_fails_phase() {
        let account = account();
        let phase = account.start(Some("MT5-1".to_string()), start());
        let later = start() + Duration::days(12);
        let ctx = TradeContext {
            account: &account,
            phase: &phase,
            history: &[],
            latest_anchor: None,
        };

        let outcome =
            ProcessTradeUseCase::apply_trade(ctx, &input(100.0, None, later), later).unwrap();

        assert!(!outcome.trade.is_closed());
        assert!(outcome.breach.is_none());
        assert!(outcome.new_phase.is_none());
        assert_eq!(
            outcome.phase_failure,
            Some(PhaseFailure::TimeLimitExceeded {
                elapsed_days: 12,
                max_trading_days: 10
            })
        );
        assert_eq!(outcome.updated_phase.status(), PhaseStatus::Failed);
        assert_eq!(outcome.updated_account.status(), AccountStatus::Failed);
    }

    #[test]
    fn resubmitted_trade_id_is_rejected() {
        let account = account();
        let phase = account.start(Some("MT5-1".to_string()), start());
        let mut first = input(100.0, Some(200.0), start());
        first.id = Some("t1".to_string());
        let booked = ProcessTradeUseCase::apply_trade(
            TradeContext {
                account: &account,
                phase: &phase,
                history: &[],
                latest_anchor: None,
            },
            &first,
            start(),
        )
        .unwrap();
        let history = vec![booked.trade.clone()];

        let mut again = input(100.0, Some(900.0), start());
        again.id = Some("t1".to_string());
        let err = ProcessTradeUseCase::apply_trade(
            TradeContext {
                account: &account,
                phase: &booked.updated_phase,
                history: &history,
                latest_anchor: booked.new_anchor.as_ref(),
            },
            &again,
            start(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            LifecycleError::DuplicateTrade {
                trade_id: TradeId::new("t1")
            }
        );
        assert_eq!(booked.updated_phase.total_trades(), 1);
    }

    #[test]
    fn preconditions_are_enforced() {
        let mut failed = account();
        failed.transition_to(AccountStatus::Failed).unwrap();
        let phase = account().start(Some("MT5-1".to_string()), start());
        let t = input(1.0, Some(2.0), start());

        let err = ProcessTradeUseCase::apply_trade(
            TradeContext {
                account: &failed,
                phase: &phase,
                history: &[],
                latest_anchor: None,
            },
            &t,
            start(),
        )
        .unwrap_err();
        assert!(matches!(err, LifecycleError::AccountFailed { .. }));

        let account = account();
        let no_id = account.start(None, start());
        let err = ProcessTradeUseCase::apply_trade(
            TradeContext {
                account: &account,
                phase: &no_id,
                history: &[],
                latest_anchor: None,
            },
            &t,
            start(),
        )
        .unwrap_err();
        assert!(matches!(err, LifecycleError::MissingExternalId { .. }));

        let mut passed = account.start(Some("X".to_string()), start());
        passed.mark_passed(start()).unwrap();
        let err = ProcessTradeUseCase::apply_trade(
            TradeContext {
                account: &account,
                phase: &passed,
                history: &[],
                latest_anchor: None,
            },
            &t,
            start(),
        )
        .unwrap_err();
        assert!(matches!(err, LifecycleError::PhaseNotActive { .. }));
    }

    #[test]
    fn close_trade_settles_open_position() {
        let account = account();
        let phase = account.start(Some("MT5-1".to_string()), start());
        let ctx = TradeContext {
            account: &account,
            phase: &phase,
            history: &[],
            latest_anchor: None,
        };
        let opened = ProcessTradeUseCase::apply_trade(ctx, &input(100.0, None, start()), start())
            .unwrap();
        let history = vec![opened.trade.clone()];
        let anchor = opened.new_anchor.clone();

        let exit_at = start() + Duration::hours(1);
        let closed = ProcessTradeUseCase::close_trade(
            TradeContext {
                account: &account,
                phase: &opened.updated_phase,
                history: &history,
                latest_anchor: anchor.as_ref(),
            },
            &opened.trade,
            Some(150.0),
            exit_at,
            exit_at,
        )
        .unwrap();

        assert_eq!(closed.trade.realized_pnl(), Some(Money::new(dec!(50))));
        assert_eq!(closed.updated_phase.total_trades(), 1);
        assert!(closed.progress.is_some());

        let err = ProcessTradeUseCase::close_trade(
            TradeContext {
                account: &account,
                phase: &closed.updated_phase,
                history: &history,
                latest_anchor: anchor.as_ref(),
            },
            &closed.trade,
            Some(150.0),
            exit_at,
            exit_at,
        )
        .unwrap_err();
        assert!(matches!(err, LifecycleError::TradeAlreadyClosed { .. }));
    }

    #[test]
    fn trade_from_other_phase_is_rejected() {
        let account = account();
        let phase = account.start(Some("MT5-1".to_string()), start());
        let other = input(100.0, None, start()).to_trade(&PhaseId::new("elsewhere"));

        let err = ProcessTradeUseCase::close_trade(
            TradeContext {
                account: &account,
                phase: &phase,
                history: &[],
                latest_anchor: None,
            },
            &other,
            Some(101.0),
            start(),
            start(),
        )
        .unwrap_err();
        assert!(matches!(err, LifecycleError::TradePhaseMismatch { .. }));
    }
}
