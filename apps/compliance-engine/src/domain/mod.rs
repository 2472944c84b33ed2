//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Aggregates**: Accounts and phases with their lifecycle invariants
//! - **Value Objects**: Immutable domain types with equality by value
//! - **Domain Services**: Stateless calculators over explicit inputs
//!
//! # Bounded Contexts
//!
//! - [`account_lifecycle`]: Accounts, phases, trades, breaches, payouts
//! - [`drawdown`]: Daily/max drawdown evaluation and historical audit
//! - [`progression`]: Evaluation phase advancement
//! - [`payout`]: Funded-account payout eligibility and settlement
//! - [`performance`]: Trade statistics (win rate, profit factor, streaks)

pub mod account_lifecycle;
pub mod drawdown;
pub mod payout;
pub mod performance;
pub mod progression;
pub mod shared;
