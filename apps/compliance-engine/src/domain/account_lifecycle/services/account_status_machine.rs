//! Account Status Machine Service
//!
//! Account status only moves toward a terminal state.

use crate::domain::account_lifecycle::errors::LifecycleError;
use crate::domain::account_lifecycle::value_objects::AccountStatus;

/// Validates account status transitions.
///
/// `active -> {passed, funded, failed}`, `passed -> {funded, failed}`,
/// `funded -> failed`. A failed account never changes again.
pub struct AccountStatusMachine;

impl AccountStatusMachine {
    /// Check if a status transition is valid.
    #[must_use]
    pub const fn is_valid_transition(from: AccountStatus, to: AccountStatus) -> bool {
        matches!(
            (from, to),
            (AccountStatus::Active, AccountStatus::Passed)
                | (AccountStatus::Active, AccountStatus::Funded)
                | (AccountStatus::Active, AccountStatus::Failed)
                | (AccountStatus::Passed, AccountStatus::Funded)
                | (AccountStatus::Passed, AccountStatus::Failed)
                | (AccountStatus::Funded, AccountStatus::Failed)
        )
    }

    /// Validate a status transition.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::InvalidAccountTransition` if the move is not allowed.
    pub const fn validate_transition(
        from: AccountStatus,
        to: AccountStatus,
    ) -> Result<(), LifecycleError> {
        if Self::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(LifecycleError::InvalidAccountTransition { from, to })
        }
    }
}
