use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Not enough cash to execute trade. Required: {required}, available: {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    #[error("Not enough shares of {symbol} to sell. Requested: {requested}, held: {held}")]
    InsufficientShares {
        symbol: String,
        requested: Decimal,
        held: Decimal,
    },

    #[error("No open position for symbol: {0}")]
    NoSuchPosition(String),
}
