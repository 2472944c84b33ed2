//! Crate-boundary error type for the compliance engine.
//!
//! Domain errors stay as hand-written enums inside their bounded contexts.
//! Callers of the library receive an [`EngineError`] carrying a stable
//! [`ErrorCode`] so results can be mapped onto API responses without
//! matching on every domain variant.
//!
//! # Categories
//!
//! | Category | Codes | Meaning |
//! |----------|-------|---------|
//! | Validation | `ACCOUNT_FAILED`, `PHASE_NOT_ACTIVE`, `MISSING_EXTERNAL_ID`, ... | Request rejected, nothing changed |
//! | Payout | `PAYOUT_NOT_ELIGIBLE`, `INVALID_PAYOUT_AMOUNT` | Settlement refused |
//! | Configuration | `INVALID_CONFIG` | Config or template unusable |
//! | Invariant | `INVARIANT_VIOLATION` | Stored state is inconsistent, treat as fatal |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::account_lifecycle::LifecycleError;
use crate::domain::payout::PayoutError;
use crate::domain::shared::DomainError;

/// Domain for compliance engine errors.
pub const ERROR_DOMAIN: &str = "prop.compliance";

/// Error codes for the compliance engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors
    /// Trade submitted against a failed account.
    AccountFailed,
    /// Phase is not active.
    PhaseNotActive,
    /// Phase has no external account identifier.
    MissingExternalId,
    /// Phase or trade does not belong to the supplied owner.
    OwnershipMismatch,
    /// Trade ID already booked.
    DuplicateTrade,
    /// Trade already closed.
    TradeAlreadyClosed,
    /// Status transition not allowed.
    InvalidTransition,
    /// Input value rejected.
    InvalidInput,
    /// Referenced entity not found.
    NotFound,

    // Payout errors
    /// Payout requested while blockers remain.
    PayoutNotEligible,
    /// Payout amount not positive or above the eligible amount.
    InvalidPayoutAmount,

    // Configuration errors
    /// Configuration could not be loaded or validated.
    InvalidConfig,

    // Fatal
    /// Stored state violates a domain invariant.
    InvariantViolation,
}

impl ErrorCode {
    /// Get the error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::AccountFailed => "ACCOUNT_FAILED",
            Self::PhaseNotActive => "PHASE_NOT_ACTIVE",
            Self::MissingExternalId => "MISSING_EXTERNAL_ID",
            Self::OwnershipMismatch => "OWNERSHIP_MISMATCH",
            Self::DuplicateTrade => "DUPLICATE_TRADE",
            Self::TradeAlreadyClosed => "TRADE_ALREADY_CLOSED",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::InvalidInput => "INVALID_INPUT",
            Self::NotFound => "NOT_FOUND",
            Self::PayoutNotEligible => "PAYOUT_NOT_ELIGIBLE",
            Self::InvalidPayoutAmount => "INVALID_PAYOUT_AMOUNT",
            Self::InvalidConfig => "INVALID_CONFIG",
            Self::InvariantViolation => "INVARIANT_VIOLATION",
        }
    }

    /// Returns true for errors the caller should treat as fatal.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::InvariantViolation)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// An error with a stable code and context.
#[derive(Debug, Error)]
pub struct EngineError {
    code: ErrorCode,
    message: String,
    context: Vec<(String, String)>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl EngineError {
    /// Create a new engine error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: Vec::new(),
            source: None,
        }
    }

    /// Add context to the error.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context.
    #[must_use]
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Serializable response body.
    #[must_use]
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            domain: ERROR_DOMAIN.to_string(),
            code: self.code.reason().to_string(),
            message: self.message.clone(),
            details: self.context.iter().cloned().collect(),
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.reason(), self.message)
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error domain.
    pub domain: String,
    /// Error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Additional details.
    pub details: std::collections::BTreeMap<String, String>,
}

impl From<DomainError> for EngineError {
    fn from(err: DomainError) -> Self {
        let code = match &err {
            DomainError::InvalidStateTransition { .. } => ErrorCode::InvalidTransition,
            DomainError::InvalidValue { .. } | DomainError::BusinessRuleViolation { .. } => {
                ErrorCode::InvalidInput
            }
            DomainError::NotFound { .. } => ErrorCode::NotFound,
            DomainError::InvariantViolation { .. } => ErrorCode::InvariantViolation,
        };
        Self::new(code, err.to_string()).with_source(err)
    }
}

impl From<LifecycleError> for EngineError {
    fn from(err: LifecycleError) -> Self {
        let (code, context) = match &err {
            LifecycleError::AccountFailed { account_id } => {
                (ErrorCode::AccountFailed, Some(("account_id", account_id.to_string())))
            }
            LifecycleError::PhaseNotActive { phase_id, .. } => {
                (ErrorCode::PhaseNotActive, Some(("phase_id", phase_id.to_string())))
            }
            LifecycleError::MissingExternalId { phase_id } => {
                (ErrorCode::MissingExternalId, Some(("phase_id", phase_id.to_string())))
            }
            LifecycleError::PhaseAccountMismatch { phase_id, .. } => {
                (ErrorCode::OwnershipMismatch, Some(("phase_id", phase_id.to_string())))
            }
            LifecycleError::TradePhaseMismatch { trade_id, .. } => {
                (ErrorCode::OwnershipMismatch, Some(("trade_id", trade_id.to_string())))
            }
            LifecycleError::DuplicateTrade { trade_id } => {
                (ErrorCode::DuplicateTrade, Some(("trade_id", trade_id.to_string())))
            }
            LifecycleError::TradeAlreadyClosed { trade_id } => {
                (ErrorCode::TradeAlreadyClosed, Some(("trade_id", trade_id.to_string())))
            }
            LifecycleError::InvalidAccountTransition { .. } => (ErrorCode::InvalidTransition, None),
            LifecycleError::Domain(inner) => return Self::from(inner.clone()),
        };

        let mut error = Self::new(code, err.to_string());
        if let Some((key, value)) = context {
            error = error.with_context(key, value);
        }
        error.with_source(err)
    }
}

impl From<PayoutError> for EngineError {
    fn from(err: PayoutError) -> Self {
        match &err {
            PayoutError::NotEligible { phase_id, blockers } => {
                let mut error = Self::new(ErrorCode::PayoutNotEligible, err.to_string())
                    .with_context("phase_id", phase_id.to_string());
                for blocker in blockers {
                    error = error.with_context(blocker.kind.to_string(), blocker.message.clone());
                }
                error.with_source(err)
            }
            PayoutError::InvalidAmount { requested, .. } => {
                Self::new(ErrorCode::InvalidPayoutAmount, err.to_string())
                    .with_context("requested", requested.to_string())
                    .with_source(err)
            }
            PayoutError::Domain(inner) => Self::from(inner.clone()),
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorCode::InvalidConfig, err.to_string()).with_source(err)
    }
}
