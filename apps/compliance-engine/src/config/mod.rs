//! Configuration module for the compliance engine.
//!
//! Loads engine settings, payout defaults, logging options and firm
//! templates from YAML, with environment variable interpolation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use compliance_engine::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Instantiate a firm preset
//! let (account, phase) = config.instantiate_template("maven-8", id, Some(login), now)?;
//! ```

mod engine;
mod observability;
mod payout;
mod templates;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::account_lifecycle::{Account, Phase};
use crate::domain::shared::AccountId;
use crate::error::{EngineError, ErrorCode};

pub use engine::EngineConfig;
pub use observability::{LoggingConfig, ObservabilityConfig};
pub use payout::PayoutConfig;
pub use templates::AccountTemplate;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Rule engine settings.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Payout split defaults.
    #[serde(default)]
    pub payout: PayoutConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Firm presets keyed by template ID.
    #[serde(default)]
    pub templates: BTreeMap<String, AccountTemplate>,
}

impl Config {
    /// Look up a template.
    #[must_use]
    pub fn template(&self, key: &str) -> Option<&AccountTemplate> {
        self.templates.get(key)
    }

    /// Create an account and its first phase from the template `key`,
    /// applying the configured payout and consistency defaults.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND` for an unknown template and `INVALID_INPUT` if the
    /// template does not describe a valid account.
    pub fn instantiate_template(
        &self,
        key: &str,
        id: AccountId,
        external_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(Account, Phase), EngineError> {
        let template = self.template(key).ok_or_else(|| {
            EngineError::new(ErrorCode::NotFound, format!("Template {key} not found"))
                .with_context("template", key)
        })?;
        template.instantiate(
            id,
            external_id,
            now,
            &self.payout.defaults(),
            self.engine.default_consistency_rule(),
        )
    }
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map(|m| m.as_str());
        match cap.get(1).map(|m| std::env::var(m.as_str())) {
            Some(Ok(v)) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let engine = &config.engine;
    if !engine.profit_factor_cap.is_finite() || engine.profit_factor_cap <= 0.0 {
        return Err(ConfigError::ValidationError(
            "engine.profit_factor_cap must be positive".to_string(),
        ));
    }

    if engine.recent_breach_window_hours < 0 {
        return Err(ConfigError::ValidationError(
            "engine.recent_breach_window_hours cannot be negative".to_string(),
        ));
    }

    if let Some(rule) = engine.default_consistency_rule
        && !(0.0..=100.0).contains(&rule)
    {
        return Err(ConfigError::ValidationError(
            "engine.default_consistency_rule must be between 0 and 100".to_string(),
        ));
    }

    let payout = &config.payout;
    for (name, value) in [
        ("initial_profit_split", payout.initial_profit_split),
        ("max_profit_split", payout.max_profit_split),
    ] {
        if !(0.0..=100.0).contains(&value) {
            return Err(ConfigError::ValidationError(format!(
                "payout.{name} must be between 0 and 100"
            )));
        }
    }

    if payout.initial_profit_split > payout.max_profit_split {
        return Err(ConfigError::ValidationError(
            "payout.initial_profit_split cannot exceed payout.max_profit_split".to_string(),
        ));
    }

    if !payout.split_increment_per_payout.is_finite() || payout.split_increment_per_payout < 0.0 {
        return Err(ConfigError::ValidationError(
            "payout.split_increment_per_payout cannot be negative".to_string(),
        ));
    }

    let valid_formats = ["json", "pretty"];
    if !valid_formats.contains(&config.observability.logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    for (key, template) in &config.templates {
        if template.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "templates.{key}.name cannot be empty"
            )));
        }
        if !template.account.starting_balance.is_some_and(|b| b.is_finite() && b > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "templates.{key}.account.startingBalance must be positive"
            )));
        }
    }

    Ok(())
}
