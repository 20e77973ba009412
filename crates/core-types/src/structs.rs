use crate::enums::TradeSide;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A simulated brokerage account: one per owner, holding the free cash
/// balance that buys draw down and sells pay into.
///
/// Positions and trades reference the portfolio by `id`; the structs are
/// plain values with explicit foreign keys, loaded and saved through the
/// ledger store rather than navigated as an object graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: Uuid,
    pub owner_id: i64,
    pub cash: Decimal,
}

impl Portfolio {
    /// Creates a fresh portfolio for an owner with the given starting cash.
    pub fn new(owner_id: i64, starting_cash: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            cash: starting_cash,
        }
    }
}

/// A holding of one symbol inside a portfolio, unique per
/// (portfolio, symbol).
///
/// `average_price` is the quantity-weighted average cost of the shares
/// currently held. It is recomputed when shares are bought and left
/// untouched when shares are sold. A position only exists while
/// `quantity > 0`; selling a position down to exactly zero deletes the
/// record instead of retaining it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub portfolio_id: Uuid,
    pub symbol: String,
    pub quantity: Decimal,
    pub average_price: Decimal,
}

impl Position {
    /// The total cost basis of the shares currently held.
    pub fn cost_basis(&self) -> Decimal {
        self.average_price * self.quantity
    }

    /// Percentage gain or loss of the holding at the given market price.
    pub fn pnl_percent(&self, current_price: Decimal) -> Decimal {
        ((current_price - self.average_price) / self.average_price) * dec!(100)
    }
}

/// One settled order in the append-only trade ledger.
///
/// Trades are immutable once created. The notional total is derived via
/// [`Trade::total`], never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: Uuid,
    pub portfolio_id: Uuid,
    pub symbol: String,
    pub side: TradeSide,
    pub quantity: Decimal,
    pub price: Decimal,
    pub executed_at: DateTime<Utc>,
}

impl Trade {
    /// The notional value of the trade (`price * quantity`).
    pub fn total(&self) -> Decimal {
        self.price * self.quantity
    }
}

/// A current market quote for one symbol, as supplied by the price oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
}

/// An order as submitted by a caller: what to trade and in which
/// direction, but deliberately without a price. The execution price is
/// resolved from the price oracle by the account service and handed to
/// the engine alongside the ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderTicket {
    pub symbol: String,
    pub side: TradeSide,
    pub quantity: Decimal,
}
