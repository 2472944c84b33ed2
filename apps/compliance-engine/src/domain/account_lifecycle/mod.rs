//! Account Lifecycle Bounded Context
//!
//! Tracks a challenge purchase from its first evaluation phase through
//! funding or failure.
//!
//! # Key Concepts
//!
//! - **Account**: Configuration of one challenge (drawdown, phase and payout rules)
//! - **Phase**: One stage of the account (phase 1, phase 2, funded) with running equity
//! - **Trade / Breach / Payout**: Records produced while an account is traded
//! - **Daily Anchor**: Equity at the start of a calendar day

pub mod aggregate;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use aggregate::{Account, NewAccountParams, OpenPhaseParams, Phase, ReconstitutedPhaseParams};
pub use errors::LifecycleError;
pub use services::{AccountStatusMachine, PhaseStateMachine};
pub use value_objects::{
    AccountStatus, AmountKind, BalancePolicy, Breach, BreachType, DailyAnchor, DrawdownMode,
    DrawdownRules, EquitySnapshot, EvaluationType, OpenTradeParams, Payout, PayoutHistory,
    PayoutPolicy, PhaseRules, PhaseStatus, PhaseTargets, PhaseType, RuleAmount, Trade, TradeSide,
};
