use crate::error::MarketDataError;
use crate::PriceOracle;
use async_trait::async_trait;
use core_types::Quote;

/// A concrete `PriceOracle` backed by a remote quote service speaking the
/// plain `GET {base}/stock/{symbol}` JSON protocol.
///
/// The service is treated as a black box: any non-success status or
/// malformed body surfaces as a `MarketDataError` and the caller decides
/// whether that means "unknown symbol" or "feed down".
#[derive(Clone)]
pub struct RemoteQuoteClient {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteQuoteClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PriceOracle for RemoteQuoteClient {
    async fn quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let symbol = symbol.to_uppercase();
        let url = format!("{}/stock/{}", self.base_url, symbol);
        tracing::debug!(%symbol, %url, "fetching quote");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(MarketDataError::Status {
                symbol,
                status: status.as_u16(),
            });
        }

        serde_json::from_str::<Quote>(&text).map_err(|e| {
            MarketDataError::Deserialization(format!(
                "quote for {}: {}. Original text: {}",
                symbol, e, text
            ))
        })
    }
}
