//! Percentage value object (0-100 scale).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::numeric_guard::sanitize_decimal;

/// A percentage expressed on the 0-100 scale (`Percentage::new(dec!(80))` is 80%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(Decimal);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(Decimal::ONE_HUNDRED);

    /// Create a percentage from a Decimal on the 0-100 scale.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Create a percentage from an untrusted float.
    #[must_use]
    pub fn sanitized(value: Option<f64>, fallback: Self) -> Self {
        Self(sanitize_decimal(value, fallback.0))
    }

    /// `numerator / denominator * 100`, or zero when the denominator is not positive.
    ///
    /// Results beyond the Decimal range saturate.
    #[must_use]
    pub fn ratio(numerator: Decimal, denominator: Decimal) -> Self {
        if denominator <= Decimal::ZERO {
            return Self::ZERO;
        }
        let saturated = if numerator.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        };
        Self(
            numerator
                .checked_div(denominator)
                .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
                .unwrap_or(saturated),
        )
    }

    /// Get the inner value on the 0-100 scale.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Clamp into `[0, 100]`.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self(self.0.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}
