//! Trade execution record.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::account_lifecycle::errors::LifecycleError;
use crate::domain::shared::{Money, PhaseId, TradeId};

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeSide {
    /// Profits when price rises.
    Long,
    /// Profits when price falls.
    Short,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => f.write_str("long"),
            Self::Short => f.write_str("short"),
        }
    }
}

/// Parameters for opening a trade. All numeric fields are already sanitized.
#[derive(Debug, Clone)]
pub struct OpenTradeParams {
    /// Trade identifier.
    pub id: TradeId,
    /// Phase the trade belongs to.
    pub phase_id: PhaseId,
    /// Instrument symbol.
    pub symbol: String,
    /// Direction.
    pub side: TradeSide,
    /// Position size.
    pub quantity: Decimal,
    /// Entry price.
    pub entry_price: Decimal,
    /// Exchange/platform fees.
    pub fees: Money,
    /// Broker commission.
    pub commission: Money,
    /// Entry time.
    pub entry_at: DateTime<Utc>,
}

/// A trade belonging to one phase.
///
/// `realized_pnl` is set exactly once, when the trade closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    id: TradeId,
    phase_id: PhaseId,
    symbol: String,
    side: TradeSide,
    quantity: Decimal,
    entry_price: Decimal,
    exit_price: Option<Decimal>,
    fees: Money,
    commission: Money,
    entry_at: DateTime<Utc>,
    exit_at: Option<DateTime<Utc>>,
    realized_pnl: Option<Money>,
}

impl Trade {
    /// Open a new trade.
    #[must_use]
    pub fn open(params: OpenTradeParams) -> Self {
        Self {
            id: params.id,
            phase_id: params.phase_id,
            symbol: params.symbol,
            side: params.side,
            quantity: params.quantity,
            entry_price: params.entry_price,
            exit_price: None,
            fees: params.fees,
            commission: params.commission,
            entry_at: params.entry_at,
            exit_at: None,
            realized_pnl: None,
        }
    }

    /// Open and immediately close a trade.
    #[must_use]
    pub fn closed(params: OpenTradeParams, exit_price: Decimal, exit_at: DateTime<Utc>) -> Self {
        let mut trade = Self::open(params);
        trade.settle(exit_price, exit_at);
        trade
    }

    /// Close the trade and fix its realized PnL.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::TradeAlreadyClosed` if the trade was closed before;
    /// realized PnL is immutable once computed.
    pub fn close(
        &mut self,
        exit_price: Decimal,
        exit_at: DateTime<Utc>,
    ) -> Result<Money, LifecycleError> {
        if self.is_closed() {
            return Err(LifecycleError::TradeAlreadyClosed {
                trade_id: self.id.clone(),
            });
        }
        Ok(self.settle(exit_price, exit_at))
    }

    fn settle(&mut self, exit_price: Decimal, exit_at: DateTime<Utc>) -> Money {
        let pnl = self.pnl_at(exit_price);
        self.exit_price = Some(exit_price);
        self.exit_at = Some(exit_at);
        self.realized_pnl = Some(pnl);
        pnl
    }

    /// Net PnL if the position were closed at `price`, after fees.
    ///
    /// Arithmetic overflow yields zero rather than a panic.
    #[must_use]
    pub fn pnl_at(&self, price: Decimal) -> Money {
        let move_per_unit = match self.side {
            TradeSide::Long => price.checked_sub(self.entry_price),
            TradeSide::Short => self.entry_price.checked_sub(price),
        };
        move_per_unit
            .and_then(|m| m.checked_mul(self.quantity))
            .and_then(|gross| gross.checked_sub(self.total_fees().amount()))
            .map_or(Money::ZERO, Money::new)
    }

    /// Fees plus commission.
    #[must_use]
    pub fn total_fees(&self) -> Money {
        self.fees + self.commission
    }

    /// Get the trade ID.
    #[must_use]
    pub const fn id(&self) -> &TradeId {
        &self.id
    }

    /// Get the owning phase ID.
    #[must_use]
    pub const fn phase_id(&self) -> &PhaseId {
        &self.phase_id
    }

    /// Get the instrument symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Get the trade direction.
    #[must_use]
    pub const fn side(&self) -> TradeSide {
        self.side
    }

    /// Get the position size.
    #[must_use]
    pub const fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Get the entry price.
    #[must_use]
    pub const fn entry_price(&self) -> Decimal {
        self.entry_price
    }

    /// Get the exit price, if closed.
    #[must_use]
    pub const fn exit_price(&self) -> Option<Decimal> {
        self.exit_price
    }

    /// Get the entry time.
    #[must_use]
    pub const fn entry_at(&self) -> DateTime<Utc> {
        self.entry_at
    }

    /// Get the exit time, if closed.
    #[must_use]
    pub const fn exit_at(&self) -> Option<DateTime<Utc>> {
        self.exit_at
    }

    /// UTC calendar date of entry.
    #[must_use]
    pub fn entry_date(&self) -> NaiveDate {
        self.entry_at.date_naive()
    }

    /// UTC calendar date of exit, if closed.
    #[must_use]
    pub fn exit_date(&self) -> Option<NaiveDate> {
        self.exit_at.map(|t| t.date_naive())
    }

    /// Realized PnL, if closed.
    #[must_use]
    pub const fn realized_pnl(&self) -> Option<Money> {
        self.realized_pnl
    }

    /// Returns true once the trade has been closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.realized_pnl.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn params(side: TradeSide) -> OpenTradeParams {
        OpenTradeParams {
            id: TradeId::new("t-1"),
            phase_id: PhaseId::new("ph-1"),
            symbol: "ES".to_string(),
            side,
            quantity: dec!(2),
            entry_price: dec!(100),
            fees: Money::new(dec!(3)),
            commission: Money::new(dec!(2)),
            entry_at: Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0).unwrap(),
        }
    }

    fn exit_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 15, 30, 0).unwrap()
    }

    #[test]
    fn long_pnl_subtracts_fees() {
        let trade = Trade::closed(params(TradeSide::Long), dec!(110), exit_time());
        // (110 - 100) * 2 - 5
        assert_eq!(trade.realized_pnl(), Some(Money::new(dec!(15))));
    }

    #[test]
    fn short_pnl_inverts_direction() {
        let trade = Trade::closed(params(TradeSide::Short), dec!(110), exit_time());
        // (100 - 110) * 2 - 5
        assert_eq!(trade.realized_pnl(), Some(Money::new(dec!(-25))));
    }

    #[test]
    fn open_trade_has_no_realized_pnl() {
        let trade = Trade::open(params(TradeSide::Long));
        assert!(!trade.is_closed());
        assert_eq!(trade.realized_pnl(), None);
        assert_eq!(trade.pnl_at(dec!(105)), Money::new(dec!(5)));
    }

    #[test]
    fn closing_twice_is_rejected() {
        let mut trade = Trade::open(params(TradeSide::Long));
        let pnl = trade.close(dec!(101), exit_time()).unwrap();
        assert_eq!(pnl, Money::new(dec!(-3)));

        let err = trade.close(dec!(500), exit_time()).unwrap_err();
        assert!(matches!(err, LifecycleError::TradeAlreadyClosed { .. }));
        assert_eq!(trade.realized_pnl(), Some(Money::new(dec!(-3))));
    }

    #[test]
    fn overflow_yields_zero_pnl() {
        let mut p = params(TradeSide::Long);
        p.quantity = Decimal::MAX;
        let trade = Trade::closed(p, Decimal::MAX, exit_time());
        assert_eq!(trade.realized_pnl(), Some(Money::ZERO));
    }

    #[test]
    fn huge_fees_saturate_instead_of_panicking() {
        let mut p = params(TradeSide::Long);
        p.fees = Money::new(Decimal::from_i128_with_scale(5 * 10_i128.pow(28), 0));
        p.commission = Money::new(Decimal::from_i128_with_scale(5 * 10_i128.pow(28), 0));
        let trade = Trade::closed(p, dec!(110), exit_time());

        assert_eq!(trade.total_fees(), Money::new(Decimal::MAX));
        assert!(trade.realized_pnl().is_some_and(|pnl| pnl.is_negative()));
    }

    #[test]
    fn dates_are_utc_calendar_days() {
        let trade = Trade::closed(params(TradeSide::Long), dec!(110), exit_time());
        assert_eq!(trade.entry_date(), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert_eq!(trade.exit_date(), NaiveDate::from_ymd_opt(2026, 3, 2));
    }
}
