//! Trade input DTO.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::account_lifecycle::{OpenTradeParams, Trade, TradeSide};
use crate::domain::shared::{Money, PhaseId, TradeId};

/// A trade event as received from a broker feed or import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeInputDto {
    /// Trade identifier; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Instrument symbol.
    pub symbol: String,
    /// Direction.
    pub side: TradeSide,
    /// Position size.
    #[serde(default)]
    pub quantity: Option<f64>,
    /// Entry price.
    #[serde(default)]
    pub entry_price: Option<f64>,
    /// Exit price; absent while the position is open.
    #[serde(default)]
    pub exit_price: Option<f64>,
    /// Exchange/platform fees.
    #[serde(default)]
    pub fees: Option<f64>,
    /// Broker commission.
    #[serde(default)]
    pub commission: Option<f64>,
    /// Entry time.
    pub entry_time: DateTime<Utc>,
    /// Exit time; defaults to the entry time when an exit price is given.
    #[serde(default)]
    pub exit_time: Option<DateTime<Utc>>,
    /// Current market price of an open position.
    #[serde(default)]
    pub mark_price: Option<f64>,
}

impl TradeInputDto {
    /// Sanitized trade parameters for `phase_id`.
    #[must_use]
    pub fn open_params(&self, phase_id: &PhaseId) -> OpenTradeParams {
        OpenTradeParams {
            id: self
                .id
                .as_deref()
                .filter(|id| !id.trim().is_empty())
                .map_or_else(TradeId::generate, TradeId::new),
            phase_id: phase_id.clone(),
            symbol: self.symbol.clone(),
            side: self.side,
            quantity: Money::sanitized(self.quantity, Money::ZERO).amount(),
            entry_price: Money::sanitized(self.entry_price, Money::ZERO).amount(),
            fees: Money::sanitized(self.fees, Money::ZERO),
            commission: Money::sanitized(self.commission, Money::ZERO),
            entry_at: self.entry_time,
        }
    }

    /// Exit price, if the input closes the trade and the price is usable.
    #[must_use]
    pub fn sanitized_exit_price(&self) -> Option<Decimal> {
        self.exit_price
            .filter(|p| p.is_finite())
            .map(|p| Money::sanitized(Some(p), Money::ZERO).amount())
    }

    /// Build the domain trade: closed when an exit price is present, open otherwise.
    #[must_use]
    pub fn to_trade(&self, phase_id: &PhaseId) -> Trade {
        let params = self.open_params(phase_id);
        match self.sanitized_exit_price() {
            Some(exit) => {
                let exit_at = self.exit_time.unwrap_or(self.entry_time);
                Trade::closed(params, exit, exit_at)
            }
            None => Trade::open(params),
        }
    }

    /// Unrealized PnL of `trade` at the mark price; zero without a usable mark.
    #[must_use]
    pub fn unrealized_pnl(&self, trade: &Trade) -> Money {
        if trade.is_closed() {
            return Money::ZERO;
        }
        self.mark_price
            .filter(|p| p.is_finite())
            .map_or(Money::ZERO, |p| {
                trade.pnl_at(Money::sanitized(Some(p), Money::ZERO).amount())
            })
    }
}
