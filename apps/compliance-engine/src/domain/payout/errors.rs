//! Payout errors.

use std::fmt;

use super::value_objects::PayoutBlocker;
use crate::domain::shared::{DomainError, Money, PhaseId};

/// Errors raised when a payout cannot be settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayoutError {
    /// Eligibility check reported blockers.
    NotEligible {
        /// Phase ID.
        phase_id: PhaseId,
        /// Failed conditions.
        blockers: Vec<PayoutBlocker>,
    },

    /// Requested amount is not positive or exceeds the eligible amount.
    InvalidAmount {
        /// Requested amount.
        requested: Money,
        /// Eligible amount.
        eligible: Money,
    },

    /// Underlying domain rule failed.
    Domain(DomainError),
}

impl fmt::Display for PayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEligible { phase_id, blockers } => {
                write!(f, "Phase {phase_id} is not eligible for payout")?;
                for blocker in blockers {
                    write!(f, "; {blocker}")?;
                }
                Ok(())
            }
            Self::InvalidAmount {
                requested,
                eligible,
            } => {
                write!(
                    f,
                    "Payout amount {requested} is invalid (eligible {eligible})"
                )
            }
            Self::Domain(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for PayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomainError> for PayoutError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}
