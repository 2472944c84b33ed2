//! Completed payouts and payout history.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::shared::{AccountId, DomainError, Money, PayoutId, Percentage, PhaseId};

/// A completed payout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    /// Payout identifier.
    pub id: PayoutId,
    /// Paid account.
    pub account_id: AccountId,
    /// Funded phase the payout was drawn from.
    pub phase_id: PhaseId,
    /// Gross amount withdrawn from the account.
    pub amount: Money,
    /// Trader split applied.
    pub profit_split: Percentage,
    /// Execution time.
    pub created_at: DateTime<Utc>,
}

/// Completed payouts of one account, newest first.
///
/// The split escalation counts entries, so construction normalizes order and
/// rejects duplicates instead of trusting the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PayoutHistory(Vec<Payout>);

impl PayoutHistory {
    /// Build a history from payouts in any order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::BusinessRuleViolation` if a payout ID appears twice.
    pub fn new(mut payouts: Vec<Payout>) -> Result<Self, DomainError> {
        let mut seen = HashSet::with_capacity(payouts.len());
        for payout in &payouts {
            if !seen.insert(payout.id.clone()) {
                return Err(DomainError::BusinessRuleViolation {
                    rule: "PAYOUT_HISTORY_UNIQUE".to_string(),
                    message: format!("payout {} listed more than once", payout.id),
                });
            }
        }
        payouts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Self(payouts))
    }

    /// Empty history.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Number of completed payouts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no payout was made yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Most recent payout.
    #[must_use]
    pub fn latest(&self) -> Option<&Payout> {
        self.0.first()
    }

    /// Iterate newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Payout> {
        self.0.iter()
    }

    /// Sum of all payout amounts.
    #[must_use]
    pub fn total_paid(&self) -> Money {
        self.0.iter().map(|p| p.amount).sum()
    }

    /// Record a new payout as the most recent entry.
    pub fn record(&mut self, payout: Payout) {
        self.0.insert(0, payout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn payout(id: &str, day: u32, amount: rust_decimal::Decimal) -> Payout {
        Payout {
            id: PayoutId::new(id),
            account_id: AccountId::new("acc-1"),
            phase_id: PhaseId::new("ph-f"),
            amount: Money::new(amount),
            profit_split: Percentage::new(dec!(80)),
            created_at: Utc.with_ymd_and_hms(2026, 5, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn history_is_sorted_newest_first() {
        let history = PayoutHistory::new(vec![
            payout("a", 1, dec!(100)),
            payout("c", 20, dec!(300)),
            payout("b", 10, dec!(200)),
        ])
        .unwrap();

        let ids: Vec<&str> = history.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
        assert_eq!(history.latest().map(|p| p.id.as_str()), Some("c"));
        assert_eq!(history.total_paid(), Money::new(dec!(600)));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let result = PayoutHistory::new(vec![payout("a", 1, dec!(100)), payout("a", 2, dec!(100))]);
        assert!(matches!(
            result,
            Err(DomainError::BusinessRuleViolation { .. })
        ));
    }

    #[test]
    fn record_prepends() {
        let mut history = PayoutHistory::new(vec![payout("a", 1, dec!(100))]).unwrap();
        history.record(payout("b", 15, dec!(50)));
        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().map(|p| p.id.as_str()), Some("b"));
    }
}
