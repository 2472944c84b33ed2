//! Payout Eligibility Calculator

use chrono::{DateTime, Days, Duration, NaiveDate, Utc};

use crate::domain::account_lifecycle::{Breach, PayoutHistory, PayoutPolicy, Phase};
use crate::domain::payout::value_objects::{BlockerKind, PayoutBlocker, PayoutEligibility};
use crate::domain::shared::Percentage;

/// Default look-back for the recent-breach condition.
pub const DEFAULT_BREACH_WINDOW_HOURS: i64 = 24;

/// Stateless payout eligibility calculator.
///
/// All conditions are evaluated; eligibility requires none to fail.
pub struct PayoutCalculator;

impl PayoutCalculator {
    /// Evaluate whether `phase` may pay out now.
    ///
    /// `history` is the account's completed payouts; its length drives the
    /// split escalation.
    #[must_use]
    pub fn evaluate(
        policy: &PayoutPolicy,
        phase: &Phase,
        history: &PayoutHistory,
        recent_breach: bool,
        now: DateTime<Utc>,
    ) -> PayoutEligibility {
        let mut blockers = Vec::new();
        let mut next_eligible_date: Option<NaiveDate> = None;
        let today = now.date_naive();

        if !phase.phase_type().is_funded() {
            blockers.push(PayoutBlocker::new(
                BlockerKind::NotFunded,
                format!("phase is {}, payouts require a funded phase", phase.phase_type()),
            ));
        }

        let days_since_funded = phase.calendar_days_elapsed(now);
        let min_days = i64::from(policy.min_days_to_first_payout);
        if days_since_funded < min_days {
            let remaining = min_days - days_since_funded;
            blockers.push(PayoutBlocker::new(
                BlockerKind::MinDaysToFirstPayout,
                format!(
                    "{remaining} day(s) remaining until first payout ({days_since_funded} of {min_days} since funding)"
                ),
            ));
            next_eligible_date = later(
                next_eligible_date,
                add_days(phase.started_at().date_naive(), policy.min_days_to_first_payout),
            );
        }

        if let Some(last) = history.latest() {
            let last_date = last.created_at.date_naive();
            let days_since_last = (today - last_date).num_days();
            let cycle = i64::from(policy.payout_cycle_days);
            if days_since_last < cycle {
                let next = add_days(last_date, policy.payout_cycle_days);
                blockers.push(PayoutBlocker::new(
                    BlockerKind::PayoutCycle,
                    format!(
                        "{days_since_last} of {cycle} cycle day(s) since last payout; next payout on {}",
                        next.map_or_else(|| "an unrepresentable date".to_string(), |d| d.to_string())
                    ),
                ));
                next_eligible_date = later(next_eligible_date, next);
            }
        }

        let net_profit = phase.net_profit_since_last_payout();
        if net_profit < policy.min_profit {
            blockers.push(PayoutBlocker::new(
                BlockerKind::MinProfit,
                format!(
                    "net profit since last payout {net_profit} is below minimum {}",
                    policy.min_profit
                ),
            ));
        }

        if recent_breach {
            blockers.push(PayoutBlocker::new(
                BlockerKind::RecentBreach,
                "drawdown breach recorded within the recent-breach window",
            ));
        }

        let profit_split_percent = Self::profit_split(policy, history.len());
        let eligible_amount = policy
            .max_payout_amount
            .map_or(net_profit, |cap| net_profit.min(cap))
            .non_negative();
        let trader_share = eligible_amount.percent_of(profit_split_percent.value());

        PayoutEligibility {
            is_eligible: blockers.is_empty(),
            eligible_amount,
            profit_split_percent,
            trader_share,
            firm_share: eligible_amount - trader_share,
            next_eligible_date,
            blockers,
        }
    }

    /// Trader split after `completed_payouts` payouts, capped at the maximum.
    #[must_use]
    pub fn profit_split(policy: &PayoutPolicy, completed_payouts: usize) -> Percentage {
        let count = rust_decimal::Decimal::from(completed_payouts);
        let escalated = policy
            .split_increment_per_payout
            .value()
            .checked_mul(count)
            .and_then(|inc| policy.initial_profit_split.value().checked_add(inc))
            .unwrap_or(policy.max_profit_split.value());
        Percentage::new(escalated.min(policy.max_profit_split.value()))
    }

    /// Returns true if any breach was recorded in the default window before `now`.
    #[must_use]
    pub fn has_recent_breach(breaches: &[Breach], now: DateTime<Utc>) -> bool {
        Self::has_breach_within(breaches, now, Duration::hours(DEFAULT_BREACH_WINDOW_HOURS))
    }

    /// Returns true if any breach was recorded within `window` before `now`.
    #[must_use]
    pub fn has_breach_within(breaches: &[Breach], now: DateTime<Utc>, window: Duration) -> bool {
        let since = now - window;
        breaches
            .iter()
            .any(|b| b.created_at() >= since && b.created_at() <= now)
    }
}

fn add_days(date: NaiveDate, days: u32) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(u64::from(days)))
}

fn later(current: Option<NaiveDate>, candidate: Option<NaiveDate>) -> Option<NaiveDate> {
    current.max(candidate)
}
