//! Data Transfer Objects
//!
//! The only place raw `f64` values exist. Every numeric field passes through
//! the numeric guard on conversion.

mod account_dto;
mod scenario_dto;
mod trade_dto;

pub use account_dto::{AccountConfigDto, PayoutDefaults, PhaseTargetsDto};
pub use scenario_dto::{ScenarioAccount, ScenarioDto, ScenarioEvent};
pub use trade_dto::TradeInputDto;
