//! Account Lifecycle Aggregates
//!
//! `Account` holds the challenge configuration and status; `Phase` holds the
//! running equity of one stage of that account.

mod account;
mod phase;

pub use account::{Account, NewAccountParams};
pub use phase::{OpenPhaseParams, Phase, ReconstitutedPhaseParams};
