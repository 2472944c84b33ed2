//! Payout value objects.

mod payout_eligibility;

pub use payout_eligibility::{BlockerKind, PayoutBlocker, PayoutEligibility};
