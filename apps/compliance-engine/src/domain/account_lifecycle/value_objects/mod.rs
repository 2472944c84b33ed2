//! Account lifecycle value objects.

mod account_status;
mod breach;
mod daily_anchor;
mod drawdown_rules;
mod equity_snapshot;
mod evaluation_type;
mod payout;
mod payout_policy;
mod phase_rules;
mod phase_status;
mod trade;

pub use account_status::AccountStatus;
pub use breach::{Breach, BreachType};
pub use daily_anchor::DailyAnchor;
pub use drawdown_rules::{AmountKind, DrawdownMode, DrawdownRules, RuleAmount};
pub use equity_snapshot::EquitySnapshot;
pub use evaluation_type::{EvaluationType, PhaseType};
pub use payout::{Payout, PayoutHistory};
pub use payout_policy::{BalancePolicy, PayoutPolicy};
pub use phase_rules::{PhaseRules, PhaseTargets};
pub use phase_status::PhaseStatus;
pub use trade::{OpenTradeParams, Trade, TradeSide};
