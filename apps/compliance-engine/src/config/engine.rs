//! Engine-wide rule settings.

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::payout::services::DEFAULT_BREACH_WINDOW_HOURS;
use crate::domain::performance::services::PROFIT_FACTOR_CAP;
use crate::domain::shared::Percentage;
use crate::domain::shared::numeric_guard::sanitize_decimal;

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Profit factor reported when there are no losses.
    #[serde(default = "default_profit_factor_cap")]
    pub profit_factor_cap: f64,
    /// Look-back window for the recent-breach payout condition.
    #[serde(default = "default_recent_breach_window_hours")]
    pub recent_breach_window_hours: i64,
    /// Consistency rule applied to accounts that configure none.
    #[serde(default)]
    pub default_consistency_rule: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            profit_factor_cap: default_profit_factor_cap(),
            recent_breach_window_hours: default_recent_breach_window_hours(),
            default_consistency_rule: None,
        }
    }
}

impl EngineConfig {
    /// Profit factor cap as a decimal.
    #[must_use]
    pub fn profit_factor_cap(&self) -> Decimal {
        sanitize_decimal(Some(self.profit_factor_cap), PROFIT_FACTOR_CAP)
    }

    /// Recent-breach window as a duration.
    #[must_use]
    pub fn recent_breach_window(&self) -> Duration {
        Duration::hours(self.recent_breach_window_hours)
    }

    /// Default consistency rule, if a positive one is configured.
    #[must_use]
    pub fn default_consistency_rule(&self) -> Option<Percentage> {
        self.default_consistency_rule
            .map(|v| Percentage::sanitized(Some(v), Percentage::ZERO))
            .filter(|p| p.value() > Decimal::ZERO)
    }
}

fn default_profit_factor_cap() -> f64 {
    999.99
}

const fn default_recent_breach_window_hours() -> i64 {
    DEFAULT_BREACH_WINDOW_HOURS
}
