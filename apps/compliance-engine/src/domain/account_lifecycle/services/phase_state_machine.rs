//! Phase State Machine Service
//!
//! Validates phase status transitions.

use crate::domain::account_lifecycle::value_objects::PhaseStatus;
use crate::domain::shared::DomainError;

/// Phase State Machine for validating transitions.
///
/// `pending -> active -> {passed, failed}`. Passed and failed phases are kept
/// for audit and never reopen.
pub struct PhaseStateMachine;

impl PhaseStateMachine {
    /// Check if a state transition is valid.
    #[must_use]
    pub const fn is_valid_transition(from: PhaseStatus, to: PhaseStatus) -> bool {
        matches!(
            (from, to),
            (PhaseStatus::Pending, PhaseStatus::Active)
                | (PhaseStatus::Active, PhaseStatus::Passed)
                | (PhaseStatus::Active, PhaseStatus::Failed)
        )
    }

    /// Validate a state transition.
    ///
    /// # Errors
    ///
    /// Returns error if the transition is invalid.
    pub fn validate_transition(from: PhaseStatus, to: PhaseStatus) -> Result<(), DomainError> {
        if Self::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(DomainError::InvalidStateTransition {
                entity: "Phase".to_string(),
                from: from.to_string(),
                to: to.to_string(),
                reason: Self::transition_error_reason(from, to),
            })
        }
    }

    /// Get a human-readable reason for an invalid transition.
    #[must_use]
    pub fn transition_error_reason(from: PhaseStatus, to: PhaseStatus) -> String {
        match from {
            PhaseStatus::Passed => format!("Phase already passed, cannot transition to {to}"),
            PhaseStatus::Failed => format!("Phase already failed, cannot transition to {to}"),
            _ => format!("Invalid transition from {from} to {to}"),
        }
    }

    /// Get all valid next states from a given state.
    #[must_use]
    pub fn valid_next_states(from: PhaseStatus) -> Vec<PhaseStatus> {
        match from {
            PhaseStatus::Pending => vec![PhaseStatus::Active],
            PhaseStatus::Active => vec![PhaseStatus::Passed, PhaseStatus::Failed],
            PhaseStatus::Passed | PhaseStatus::Failed => vec![],
        }
    }
}
