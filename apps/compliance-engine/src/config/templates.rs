//! Firm presets.
//!
//! A template carries everything an account needs except its identity, so a
//! purchase can be recorded from the firm name and plan alone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::dto::{AccountConfigDto, PayoutDefaults};
use crate::domain::account_lifecycle::{Account, Phase};
use crate::domain::shared::{AccountId, Percentage};
use crate::error::EngineError;

/// Named account preset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountTemplate {
    /// Display name used for accounts created from this template.
    pub name: String,
    /// Account rules.
    pub account: AccountConfigDto,
}

impl AccountTemplate {
    /// Create an account and its first phase from this template.
    ///
    /// `default_consistency_rule` applies only when the template has none.
    ///
    /// # Errors
    ///
    /// Returns an `EngineError` with `INVALID_INPUT` if the template does not
    /// describe a valid account.
    pub fn instantiate(
        &self,
        id: AccountId,
        external_id: Option<String>,
        now: DateTime<Utc>,
        defaults: &PayoutDefaults,
        default_consistency_rule: Option<Percentage>,
    ) -> Result<(Account, Phase), EngineError> {
        let mut params = self.account.to_params(id, self.name.clone(), now, defaults);
        if params.consistency_rule.is_none() {
            params.consistency_rule = default_consistency_rule;
        }

        let account = Account::new(params)
            .map_err(|e| EngineError::from(e).with_context("template", self.name.clone()))?;
        let phase = account.start(external_id, now);

        tracing::info!(
            account_id = %account.id(),
            phase_id = %phase.id(),
            template = %self.name,
            starting_balance = %account.starting_balance(),
            "Account created from template"
        );

        Ok((account, phase))
    }
}
