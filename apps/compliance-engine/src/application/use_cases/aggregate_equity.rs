//! Account/Equity Aggregation
//!
//! Reporting over collections of accounts. Failed accounts never contribute
//! to equity totals.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::account_lifecycle::{Account, AccountStatus, EvaluationType, Phase};
use crate::domain::shared::{DomainError, Money};

/// Criteria for [`AccountAggregator::filter_accounts`]. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFilter {
    /// Exact status.
    pub status: Option<AccountStatus>,
    /// Prop firm, case-insensitive.
    pub prop_firm: Option<String>,
    /// Evaluation type.
    pub evaluation_type: Option<EvaluationType>,
    /// Substring of the account name, case-insensitive.
    pub search: Option<String>,
}

impl AccountFilter {
    fn matches(&self, account: &Account) -> bool {
        self.status.is_none_or(|s| account.status() == s)
            && self
                .prop_firm
                .as_deref()
                .is_none_or(|firm| account.prop_firm().eq_ignore_ascii_case(firm))
            && self
                .evaluation_type
                .is_none_or(|e| account.evaluation_type() == e)
            && self.search.as_deref().is_none_or(|needle| {
                account
                    .name()
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
            })
    }
}

/// Sort key for [`AccountAggregator::sort_accounts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountSortKey {
    /// Display name.
    Name,
    /// Prop firm name.
    PropFirm,
    /// Starting balance.
    StartingBalance,
    /// Status.
    Status,
    /// Purchase time.
    CreatedAt,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

/// Grouping key for [`AccountAggregator::group_accounts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountGroupKey {
    /// Group by status.
    Status,
    /// Group by prop firm.
    PropFirm,
    /// Group by evaluation type.
    EvaluationType,
}

/// Stateless account aggregation helpers.
pub struct AccountAggregator;

impl AccountAggregator {
    /// Accounts that count toward equity totals.
    #[must_use]
    pub fn filter_active_accounts_for_equity(accounts: &[Account]) -> Vec<&Account> {
        accounts.iter().filter(|a| !a.is_failed()).collect()
    }

    /// The active phase of `account`, if any.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvariantViolation` if the account has more than
    /// one active phase.
    pub fn active_phase<'a>(
        account: &Account,
        phases: &'a [Phase],
    ) -> Result<Option<&'a Phase>, DomainError> {
        let mut active = phases
            .iter()
            .filter(|p| p.account_id() == account.id() && p.is_active());

        let first = active.next();
        if let Some(second) = active.next() {
            return Err(DomainError::InvariantViolation {
                aggregate: "Account".to_string(),
                invariant: "at most one active phase per account".to_string(),
                state: format!(
                    "account {} has active phases {} and {}",
                    account.id(),
                    first.map_or("?", |p| p.id().as_str()),
                    second.id()
                ),
            });
        }
        Ok(first)
    }

    /// Sum of active-phase equity over non-failed accounts.
    ///
    /// An account without an active phase contributes its starting balance.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvariantViolation` if an account has more than
    /// one active phase.
    pub fn calculate_total_equity(
        accounts: &[Account],
        phases: &[Phase],
    ) -> Result<Money, DomainError> {
        let mut total = Money::ZERO;
        for account in Self::filter_active_accounts_for_equity(accounts) {
            total += Self::active_phase(account, phases)?
                .map_or(account.starting_balance(), Phase::current_equity);
        }
        Ok(total)
    }

    /// Accounts matching `filter`.
    #[must_use]
    pub fn filter_accounts<'a>(accounts: &'a [Account], filter: &AccountFilter) -> Vec<&'a Account> {
        accounts.iter().filter(|a| filter.matches(a)).collect()
    }

    /// Sort accounts in place. Ties keep their input order.
    pub fn sort_accounts(accounts: &mut [&Account], key: AccountSortKey, direction: SortDirection) {
        accounts.sort_by(|a, b| {
            let ordering = Self::compare(a, b, key);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    /// Group accounts by `key`, groups ordered by key name.
    #[must_use]
    pub fn group_accounts(
        accounts: &[Account],
        key: AccountGroupKey,
    ) -> BTreeMap<String, Vec<&Account>> {
        let mut groups: BTreeMap<String, Vec<&Account>> = BTreeMap::new();
        for account in accounts {
            let group = match key {
                AccountGroupKey::Status => account.status().to_string(),
                AccountGroupKey::PropFirm => account.prop_firm().to_string(),
                AccountGroupKey::EvaluationType => account.evaluation_type().to_string(),
            };
            groups.entry(group).or_default().push(account);
        }
        groups
    }

    fn compare(a: &Account, b: &Account, key: AccountSortKey) -> Ordering {
        match key {
            AccountSortKey::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
            AccountSortKey::PropFirm => a
                .prop_firm()
                .to_lowercase()
                .cmp(&b.prop_firm().to_lowercase()),
            AccountSortKey::StartingBalance => a.starting_balance().cmp(&b.starting_balance()),
            AccountSortKey::Status => a.status().cmp(&b.status()),
            AccountSortKey::CreatedAt => a.created_at().cmp(&b.created_at()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account_lifecycle::{
        BalancePolicy, DrawdownMode, DrawdownRules, NewAccountParams, PayoutPolicy, PhaseRules,
        PhaseTargets, RuleAmount,
    };
    use crate::domain::shared::{AccountId, Percentage};
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn account(id: &str, firm: &str, balance: Decimal, status: AccountStatus, day: i64) -> Account {
        Account::reconstitute(
            NewAccountParams {
                id: AccountId::new(id),
                name: format!("Account {id}"),
                prop_firm: firm.to_string(),
                starting_balance: Money::new(balance),
                evaluation_type: EvaluationType::OneStep,
                drawdown: DrawdownRules::new(
                    RuleAmount::percent(dec!(5)),
                    RuleAmount::percent(dec!(10)),
                    DrawdownMode::Static,
                ),
                phase_rules: PhaseRules {
                    phase_1: PhaseTargets {
                        profit_target: RuleAmount::percent(dec!(10)),
                        min_trading_days: 0,
                        max_trading_days: None,
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
                created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
                    + Duration::days(day),
            },
            status,
        )
        .unwrap()
    }

    fn fixture() -> Vec<Account> {
        vec![
            account("a", "Apex", dec!(50000), AccountStatus::Active, 2),
            account("b", "FTMO", dec!(100000), AccountStatus::Failed, 1),
            account("c", "apex", dec!(25000), AccountStatus::Funded, 3),
        ]
    }

    #[test]
    fn failed_accounts_excluded_from_equity() {
        let accounts = fixture();
        let mut phase_a = accounts[0].start(Some("1".to_string()), accounts[0].created_at());
        phase_a.record_closed_trade(Money::new(dec!(1500)), Money::ZERO);
        let phase_b = accounts[1].start(Some("2".to_string()), accounts[1].created_at());

        let total = AccountAggregator::calculate_total_equity(&accounts, &[phase_a, phase_b])
            .unwrap();

        // a: 51500 from its phase; c: no phase, starting balance; b excluded
        assert_eq!(total, Money::new(dec!(76500)));
        assert_eq!(
            AccountAggregator::filter_active_accounts_for_equity(&accounts).len(),
            2
        );
    }

    #[test]
    fn two_active_phases_is_an_invariant_violation() {
        let accounts = fixture();
        let p1 = accounts[0].start(Some("1".to_string()), accounts[0].created_at());
        let p2 = accounts[0].start(Some("1".to_string()), accounts[0].created_at());

        let err = AccountAggregator::calculate_total_equity(&accounts, &[p1, p2]).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation { .. }));
    }

    #[test]
    fn filter_by_firm_is_case_insensitive() {
        let accounts = fixture();
        let filter = AccountFilter {
            prop_firm: Some("APEX".to_string()),
            ..AccountFilter::default()
        };
        let ids: Vec<&str> = AccountAggregator::filter_accounts(&accounts, &filter)
            .iter()
            .map(|a| a.id().as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn sort_by_balance_desc() {
        let accounts = fixture();
        let mut refs: Vec<&Account> = accounts.iter().collect();
        AccountAggregator::sort_accounts(
            &mut refs,
            AccountSortKey::StartingBalance,
            SortDirection::Desc,
        );
        let ids: Vec<&str> = refs.iter().map(|a| a.id().as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);

        AccountAggregator::sort_accounts(&mut refs, AccountSortKey::CreatedAt, SortDirection::Asc);
        let ids: Vec<&str> = refs.iter().map(|a| a.id().as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn group_by_status() {
        let accounts = fixture();
        let groups = AccountAggregator::group_accounts(&accounts, AccountGroupKey::Status);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups["failed"].len(), 1);
        assert_eq!(groups["funded"][0].id().as_str(), "c");
    }
}
