//! Use Cases
//!
//! Application-specific operations built from domain services.

mod account_ledger;
mod aggregate_equity;
mod process_trade;
mod replay_scenario;

pub use account_ledger::AccountLedger;
pub use aggregate_equity::{
    AccountAggregator, AccountFilter, AccountGroupKey, AccountSortKey, SortDirection,
};
pub use process_trade::{
    AccountStatusChange, PhaseFailure, ProcessTradeUseCase, TradeContext, TradeOutcome,
};
pub use replay_scenario::{EventResult, ReplayScenarioUseCase, ScenarioReport};
