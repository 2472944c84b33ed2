//! Scenario replay DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountConfigDto, TradeInputDto};

/// Where the account of a scenario comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScenarioAccount {
    /// A firm preset from the configuration file.
    Template {
        /// Template ID.
        template: String,
    },
    /// Inline account rules.
    Inline {
        /// Account rules.
        account: AccountConfigDto,
        /// Display name.
        #[serde(default)]
        name: Option<String>,
    },
}

/// One recorded event, replayed in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioEvent {
    /// A trade, open or closed.
    Trade(TradeInputDto),
    /// Close of an earlier open trade.
    #[serde(rename_all = "camelCase")]
    Close {
        /// ID of the open trade.
        trade_id: String,
        /// Exit price; the entry price when missing.
        #[serde(default)]
        exit_price: Option<f64>,
        /// Exit time.
        exit_time: DateTime<Utc>,
    },
    /// Payout request on the funded phase.
    #[serde(rename_all = "camelCase")]
    Payout {
        /// Requested gross amount; the full eligible amount when missing.
        #[serde(default)]
        amount: Option<f64>,
        /// Request time.
        at: DateTime<Utc>,
    },
}

impl ScenarioEvent {
    /// Time the event takes effect.
    #[must_use]
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::Trade(trade) => trade.exit_time.unwrap_or(trade.entry_time),
            Self::Close { exit_time, .. } => *exit_time,
            Self::Payout { at, .. } => *at,
        }
    }
}

/// A recorded account history to replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDto {
    /// Account identifier; generated when absent.
    #[serde(default)]
    pub account_id: Option<String>,
    /// Account source.
    #[serde(flatten)]
    pub source: ScenarioAccount,
    /// Trading platform login of the first phase.
    #[serde(default)]
    pub external_id: Option<String>,
    /// Purchase time.
    pub created_at: DateTime<Utc>,
    /// Events in the order they happened.
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
    /// Time for the closing payout eligibility check; the last event time
    /// when absent.
    #[serde(default)]
    pub evaluate_at: Option<DateTime<Utc>>,
}
