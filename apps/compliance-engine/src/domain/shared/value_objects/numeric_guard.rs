//! Numeric guard for untrusted input.
//!
//! Every numeric field that crosses the engine boundary passes through one of
//! these functions exactly once. Downstream code holds `Decimal`/`Money`
//! values and never sees NaN or infinity.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// Return `value` when it is present and finite, otherwise `fallback`.
#[must_use]
pub fn sanitize(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => fallback,
    }
}

/// Convert an untrusted float to a `Decimal`.
///
/// Finite values outside the `Decimal` range also yield `fallback`.
#[must_use]
pub fn sanitize_decimal(value: Option<f64>, fallback: Decimal) -> Decimal {
    value
        .filter(|v| v.is_finite())
        .and_then(Decimal::from_f64)
        .unwrap_or(fallback)
}

/// Convert an untrusted float to a whole day count.
///
/// Negative values clamp to zero; fractional values are truncated.
#[must_use]
pub fn sanitize_days(value: Option<f64>, fallback: u32) -> u32 {
    let v = sanitize(value, f64::from(fallback));
    if v <= 0.0 {
        0
    } else if v >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        v.trunc() as u32
    }
}
