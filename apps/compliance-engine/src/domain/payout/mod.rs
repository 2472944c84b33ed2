//! Payout Bounded Context
//!
//! Eligibility and settlement of profit-split payouts on funded phases.
//!
//! # Key Concepts
//!
//! - **Eligibility**: every condition is checked; each failure becomes a blocker
//! - **Split escalation**: the trader split grows with each completed payout
//! - **Settlement**: records a payout and applies the account's balance policy

pub mod errors;
pub mod services;
pub mod value_objects;

pub use errors::PayoutError;
pub use services::{PayoutCalculator, PayoutSettlement};
pub use value_objects::{BlockerKind, PayoutBlocker, PayoutEligibility};
