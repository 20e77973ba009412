use async_trait::async_trait;
use core_types::Quote;

pub mod error;
pub mod remote;
pub mod simulated;

// --- Public API ---
pub use error::MarketDataError;
pub use remote::RemoteQuoteClient;
pub use simulated::SimulatedQuoteFeed;

/// The generic, abstract interface for a source of current market prices.
/// This trait is the contract the account service and the HTTP shell use,
/// allowing the underlying implementation (remote service or synthetic
/// feed) to be swapped out.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Fetches the current quote for a symbol.
    ///
    /// Implementations may be slow or unreliable; callers must treat a
    /// failure as "price unavailable" and must not hold portfolio locks
    /// across this call.
    async fn quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;
}
