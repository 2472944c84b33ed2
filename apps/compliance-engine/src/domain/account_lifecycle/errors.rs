//! Account lifecycle errors.
//!
//! All variants are validation failures: the request is rejected and no
//! state changes. Breaches are outcomes, not errors.

use std::fmt;

use super::value_objects::{AccountStatus, PhaseStatus};
use crate::domain::shared::{AccountId, DomainError, PhaseId, TradeId};

/// Errors raised when a trade event cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// Trade submitted against a failed account.
    AccountFailed {
        /// Account ID.
        account_id: AccountId,
    },

    /// Trade submitted against a phase that is not active.
    PhaseNotActive {
        /// Phase ID.
        phase_id: PhaseId,
        /// Current phase status.
        status: PhaseStatus,
    },

    /// Phase lacks its external (platform) identifier.
    MissingExternalId {
        /// Phase ID.
        phase_id: PhaseId,
    },

    /// Phase does not belong to the account.
    PhaseAccountMismatch {
        /// Phase ID.
        phase_id: PhaseId,
        /// Account the caller supplied.
        account_id: AccountId,
    },

    /// Trade ID already booked on the account.
    DuplicateTrade {
        /// Trade ID.
        trade_id: TradeId,
    },

    /// Trade already has a realized PnL.
    TradeAlreadyClosed {
        /// Trade ID.
        trade_id: TradeId,
    },

    /// Trade belongs to a different phase.
    TradePhaseMismatch {
        /// Trade ID.
        trade_id: TradeId,
        /// Phase the caller supplied.
        phase_id: PhaseId,
    },

    /// Account status transition not allowed.
    InvalidAccountTransition {
        /// Current status.
        from: AccountStatus,
        /// Requested status.
        to: AccountStatus,
    },

    /// Underlying domain rule failed.
    Domain(DomainError),
}

impl LifecycleError {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::AccountFailed { .. } => "ACCOUNT_FAILED",
            Self::PhaseNotActive { .. } => "PHASE_NOT_ACTIVE",
            Self::MissingExternalId { .. } => "MISSING_EXTERNAL_ID",
            Self::PhaseAccountMismatch { .. } => "PHASE_ACCOUNT_MISMATCH",
            Self::DuplicateTrade { .. } => "DUPLICATE_TRADE",
            Self::TradeAlreadyClosed { .. } => "TRADE_ALREADY_CLOSED",
            Self::TradePhaseMismatch { .. } => "TRADE_PHASE_MISMATCH",
            Self::InvalidAccountTransition { .. } => "INVALID_ACCOUNT_TRANSITION",
            Self::Domain(_) => "DOMAIN_RULE",
        }
    }
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccountFailed { account_id } => {
                write!(f, "Account {account_id} has failed and accepts no trades")
            }
            Self::PhaseNotActive { phase_id, status } => {
                write!(f, "Phase {phase_id} is {status}, not active")
            }
            Self::MissingExternalId { phase_id } => {
                write!(f, "Phase {phase_id} has no external account identifier")
            }
            Self::PhaseAccountMismatch {
                phase_id,
                account_id,
            } => {
                write!(f, "Phase {phase_id} does not belong to account {account_id}")
            }
            Self::DuplicateTrade { trade_id } => {
                write!(f, "Trade {trade_id} is already booked; open trades close through close_trade")
            }
            Self::TradeAlreadyClosed { trade_id } => {
                write!(f, "Trade {trade_id} is already closed")
            }
            Self::TradePhaseMismatch { trade_id, phase_id } => {
                write!(f, "Trade {trade_id} does not belong to phase {phase_id}")
            }
            Self::InvalidAccountTransition { from, to } => {
                write!(f, "Account cannot move from {from} to {to}")
            }
            Self::Domain(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for LifecycleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomainError> for LifecycleError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_failed_display() {
        let err = LifecycleError::AccountFailed {
            account_id: AccountId::new("acc-9"),
        };
        assert!(err.to_string().contains("acc-9"));
        assert_eq!(err.code(), "ACCOUNT_FAILED");
    }

    #[test]
    fn phase_not_active_display() {
        let err = LifecycleError::PhaseNotActive {
            phase_id: PhaseId::new("ph-1"),
            status: PhaseStatus::Passed,
        };
        let msg = err.to_string();
        assert!(msg.contains("ph-1"));
        assert!(msg.contains("passed"));
    }

    #[test]
    fn duplicate_trade_display() {
        let err = LifecycleError::DuplicateTrade {
            trade_id: TradeId::new("t-7"),
        };
        assert!(err.to_string().contains("t-7"));
        assert_eq!(err.code(), "DUPLICATE_TRADE");
    }

    #[test]
    fn domain_error_is_source() {
        use std::error::Error as _;
        let err = LifecycleError::from(DomainError::InvalidValue {
            field: "x".to_string(),
            message: "bad".to_string(),
        });
        assert!(err.source().is_some());
        assert_eq!(err.code(), "DOMAIN_RULE");
    }
}
