//! Domain errors for the compliance engine.

use std::fmt;

/// Domain-level errors that can occur in business logic.
///
/// These errors are independent of infrastructure concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid state transition attempted.
    InvalidStateTransition {
        /// Entity type (e.g., "Phase").
        entity: String,
        /// Current state.
        from: String,
        /// Attempted state.
        to: String,
        /// Reason for failure.
        reason: String,
    },

    /// Invalid value for a field.
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Business rule violation.
    BusinessRuleViolation {
        /// Rule name or code.
        rule: String,
        /// Description of the violation.
        message: String,
    },

    /// Entity not found.
    NotFound {
        /// Entity type.
        entity_type: String,
        /// Entity identifier.
        id: String,
    },

    /// Aggregate invariant violated.
    ///
    /// Signals upstream state corruption (e.g. two active phases for one
    /// account). Callers should treat this as fatal.
    InvariantViolation {
        /// Aggregate type.
        aggregate: String,
        /// Invariant that was violated.
        invariant: String,
        /// Current state description.
        state: String,
    },
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStateTransition {
                entity,
                from,
                to,
                reason,
            } => {
                write!(
                    f,
                    "Invalid state transition for {entity}: {from} -> {to}: {reason}"
                )
            }
            Self::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{field}': {message}")
            }
            Self::BusinessRuleViolation { rule, message } => {
                write!(f, "Business rule '{rule}' violated: {message}")
            }
            Self::NotFound { entity_type, id } => {
                write!(f, "{entity_type} not found: {id}")
            }
            Self::InvariantViolation {
                aggregate,
                invariant,
                state,
            } => {
                write!(
                    f,
                    "Invariant violation in {aggregate}: {invariant} (state: {state})"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_invalid_state_transition_display() {
        let err = DomainError::InvalidStateTransition {
            entity: "Phase".to_string(),
            from: "FAILED".to_string(),
            to: "ACTIVE".to_string(),
            reason: "Failed phases are terminal".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("Phase"));
        assert!(msg.contains("FAILED"));
        assert!(msg.contains("ACTIVE"));
    }

    #[test]
    fn domain_error_invalid_value_display() {
        let err = DomainError::InvalidValue {
            field: "starting_balance".to_string(),
            message: "must be positive".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("starting_balance"));
        assert!(msg.contains("positive"));
    }

    #[test]
    fn domain_error_business_rule_display() {
        let err = DomainError::BusinessRuleViolation {
            rule: "PAYOUT_HISTORY_ORDER".to_string(),
            message: "duplicate payout id".to_string(),
        };
        assert!(format!("{err}").contains("PAYOUT_HISTORY_ORDER"));
    }

    #[test]
    fn domain_error_not_found_display() {
        let err = DomainError::NotFound {
            entity_type: "Phase".to_string(),
            id: "ph-123".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("Phase"));
        assert!(msg.contains("ph-123"));
    }

    #[test]
    fn domain_error_invariant_display() {
        let err = DomainError::InvariantViolation {
            aggregate: "Account".to_string(),
            invariant: "exactly one active phase".to_string(),
            state: "2 active phases".to_string(),
        };
        assert!(format!("{err}").contains("exactly one active phase"));
    }

    #[test]
    fn domain_error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(DomainError::InvalidValue {
            field: "test".to_string(),
            message: "test".to_string(),
        });
        assert!(!err.to_string().is_empty());
    }
}
