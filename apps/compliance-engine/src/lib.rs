// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! Compliance Engine - Rust Core Library
//!
//! Deterministic rules engine for prop-firm trading accounts. Given an
//! account's configuration, its phases and its trades, the engine decides
//! whether a drawdown limit was breached, whether the phase advances, and
//! whether a funded account may take a payout.
//!
//! # Architecture (Clean Architecture + DDD)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic, pure and synchronous
//!   - `account_lifecycle`: Account and Phase aggregates, trades, breaches, payouts
//!   - `drawdown`: Daily/max drawdown evaluation, historical audit
//!   - `progression`: Profit target, trading days, consistency
//!   - `payout`: Eligibility, split escalation, settlement
//!   - `performance`: Win rate, profit factor, streaks
//!
//! - **Application**: Use cases and orchestration
//!   - `dto`: Boundary input, sanitized by the numeric guard
//!   - `use_cases`: `ProcessTrade`, `AccountLedger`, `ReplayScenario`, `AccountAggregator`
//!
//! - **Config / Telemetry**: YAML configuration with firm templates, tracing setup
//!
//! The engine performs no I/O; callers load and persist state and serialize
//! writers per (account, phase).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and DTOs.
pub mod application;

/// Configuration loading and firm templates.
pub mod config;

/// Crate-boundary error type.
pub mod error;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::account_lifecycle::{
    Account, AccountStatus, Breach, BreachType, DrawdownMode, DrawdownRules, EvaluationType,
    LifecycleError, Payout, PayoutHistory, PayoutPolicy, Phase, PhaseStatus, PhaseType,
    RuleAmount, Trade, TradeSide,
};
pub use domain::drawdown::{
    DrawdownAudit, DrawdownAuditService, DrawdownCalculator, DrawdownInput, DrawdownResult,
};
pub use domain::payout::{PayoutCalculator, PayoutEligibility, PayoutError, PayoutSettlement};
pub use domain::performance::{RiskMetrics, RiskMetricsCalculator};
pub use domain::progression::{PhaseProgress, ProgressionEvaluator};
pub use domain::shared::{AccountId, DomainError, Money, Percentage, PhaseId, TradeId};

// Application re-exports
pub use application::dto::{AccountConfigDto, ScenarioDto, TradeInputDto};
pub use application::use_cases::{
    AccountAggregator, AccountLedger, ProcessTradeUseCase, ReplayScenarioUseCase, ScenarioReport,
    TradeContext, TradeOutcome,
};

// Boundary re-exports
pub use config::{Config, ConfigError, load_config, load_config_from_string};
pub use error::{EngineError, ErrorCode};
