//! Shared Value Objects
//!
//! Immutable domain types used across bounded contexts.
//! Value objects are compared by value, not identity.

mod identifiers;
mod money;
pub mod numeric_guard;
mod percentage;

pub use identifiers::{AccountId, BreachId, PayoutId, PhaseId, TradeId};
pub use money::Money;
pub use percentage::Percentage;
