use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Failed to reach the quote service: {0}")]
    Http(#[from] reqwest::Error),

    #[error("The quote service returned status {status} for symbol {symbol}")]
    Status { symbol: String, status: u16 },

    #[error("Failed to deserialize the quote response: {0}")]
    Deserialization(String),
}

impl MarketDataError {
    /// True when the quote service itself reported the symbol as unknown,
    /// as opposed to a transport or decoding failure on our side.
    pub fn is_not_found(&self) -> bool {
        matches!(self, MarketDataError::Status { status: 404, .. })
    }
}
