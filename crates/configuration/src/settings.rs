use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerSettings,
    #[serde(default)]
    pub account: AccountSettings,
    pub market_data: MarketDataSettings,
}

/// Contains parameters for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// The interface to bind (e.g., "127.0.0.1").
    pub host: String,
    /// The port to listen on (e.g., 8000).
    pub port: u16,
}

/// Contains parameters for newly opened accounts.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountSettings {
    /// The cash balance a portfolio opens with when an owner trades
    /// for the first time.
    #[serde(default = "default_starting_cash")]
    pub starting_cash: Decimal,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            starting_cash: default_starting_cash(),
        }
    }
}

fn default_starting_cash() -> Decimal {
    dec!(10000.00)
}

/// Selects where stock quotes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteProvider {
    /// Synthesize quotes in-process. No network access required.
    Simulated,
    /// Fetch quotes over HTTP from `base_url`.
    Remote,
}

/// Contains parameters for the quote source.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketDataSettings {
    pub provider: QuoteProvider,
    /// Base URL of the quote service. Required when `provider = "remote"`.
    pub base_url: Option<String>,
}
