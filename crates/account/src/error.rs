use engine::EngineError;
use ledger_store::LedgerStoreError;
use market_data::MarketDataError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccountError {
    /// Engine rejections pass through unchanged so the boundary can map
    /// each kind to its own user-visible status.
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("No portfolio exists for owner {0}")]
    PortfolioNotFound(i64),

    #[error("No price available for {symbol}")]
    PriceUnavailable {
        symbol: String,
        #[source]
        source: MarketDataError,
    },

    #[error("The ledger store is unavailable: {0}")]
    StoreUnavailable(#[from] LedgerStoreError),
}
