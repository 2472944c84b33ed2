//! Payout split defaults.

use serde::{Deserialize, Serialize};

use crate::application::dto::PayoutDefaults;
use crate::domain::shared::Percentage;

/// Split defaults for accounts that omit them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutConfig {
    /// Trader split for the first payout.
    #[serde(default = "default_initial_profit_split")]
    pub initial_profit_split: f64,
    /// Split added per completed payout.
    #[serde(default)]
    pub split_increment_per_payout: f64,
    /// Upper bound of the split.
    #[serde(default = "default_max_profit_split")]
    pub max_profit_split: f64,
    /// Days between payouts.
    #[serde(default = "default_payout_cycle_days")]
    pub payout_cycle_days: u32,
}

impl Default for PayoutConfig {
    fn default() -> Self {
        Self {
            initial_profit_split: default_initial_profit_split(),
            split_increment_per_payout: 0.0,
            max_profit_split: default_max_profit_split(),
            payout_cycle_days: default_payout_cycle_days(),
        }
    }
}

impl PayoutConfig {
    /// Sanitized defaults for DTO conversion.
    #[must_use]
    pub fn defaults(&self) -> PayoutDefaults {
        PayoutDefaults {
            initial_profit_split: Percentage::sanitized(
                Some(self.initial_profit_split),
                Percentage::ZERO,
            )
            .clamped(),
            split_increment_per_payout: Percentage::sanitized(
                Some(self.split_increment_per_payout),
                Percentage::ZERO,
            ),
            max_profit_split: Percentage::sanitized(Some(self.max_profit_split), Percentage::HUNDRED)
                .clamped(),
            payout_cycle_days: self.payout_cycle_days,
        }
    }
}

fn default_initial_profit_split() -> f64 {
    80.0
}

fn default_max_profit_split() -> f64 {
    90.0
}

const fn default_payout_cycle_days() -> u32 {
    14
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_split_ladder() {
        let defaults = PayoutConfig::default().defaults();
        assert_eq!(defaults.initial_profit_split, Percentage::new(dec!(80)));
        assert_eq!(defaults.split_increment_per_payout, Percentage::ZERO);
        assert_eq!(defaults.max_profit_split, Percentage::new(dec!(90)));
        assert_eq!(defaults.payout_cycle_days, 14);
    }
}
