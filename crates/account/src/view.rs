use chrono::{DateTime, Utc};
use core_types::{Position, Quote, Trade, TradeSide};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// A portfolio as the frontend sees it: cash plus live-priced positions.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioView {
    pub cash: Decimal,
    pub positions: Vec<PositionView>,
}

/// One held position enriched with the quote it was just priced against.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionView {
    pub symbol: String,
    pub quantity: Decimal,
    pub average_price: Decimal,
    pub current_price: Decimal,
    pub total_value: Decimal,
    /// Percentage gain or loss against the average cost basis.
    pub profit_loss: Decimal,
}

impl PositionView {
    pub(crate) fn from_quote(position: &Position, quote: &Quote) -> Self {
        Self {
            symbol: position.symbol.clone(),
            quantity: position.quantity,
            average_price: position.average_price,
            current_price: quote.price,
            total_value: quote.price * position.quantity,
            profit_loss: position.pnl_percent(quote.price),
        }
    }
}

/// One ledger entry as the frontend sees it. `total` is derived from the
/// executed price and quantity, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct TradeView {
    pub id: Uuid,
    pub symbol: String,
    pub action: TradeSide,
    pub quantity: Decimal,
    pub price: Decimal,
    pub total: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl From<Trade> for TradeView {
    fn from(trade: Trade) -> Self {
        let total = trade.total();
        Self {
            id: trade.id,
            symbol: trade.symbol,
            action: trade.side,
            quantity: trade.quantity,
            price: trade.price,
            total,
            timestamp: trade.executed_at,
        }
    }
}

/// A successful execution: the appended ledger entry plus the cash balance
/// it left behind.
#[derive(Debug, Clone)]
pub struct TradeReceipt {
    pub trade: Trade,
    pub new_balance: Decimal,
}
