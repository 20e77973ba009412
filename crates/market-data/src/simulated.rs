use crate::error::MarketDataError;
use crate::PriceOracle;
use async_trait::async_trait;
use core_types::Quote;
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// A listing in the synthetic exchange: a stable reference price that each
/// quote jitters around.
struct Listing {
    symbol: &'static str,
    name: &'static str,
    price: Decimal,
    change: Decimal,
}

const LISTINGS: &[Listing] = &[
    Listing { symbol: "AAPL", name: "Apple Inc.", price: dec!(181.75), change: dec!(1.35) },
    Listing { symbol: "MSFT", name: "Microsoft Corporation", price: dec!(339.48), change: dec!(0.89) },
    Listing { symbol: "GOOGL", name: "Alphabet Inc.", price: dec!(138.12), change: dec!(-0.45) },
    Listing { symbol: "AMZN", name: "Amazon.com Inc.", price: dec!(128.74), change: dec!(2.25) },
    Listing { symbol: "TSLA", name: "Tesla Inc.", price: dec!(238.01), change: dec!(-1.20) },
    Listing { symbol: "META", name: "Meta Platforms Inc.", price: dec!(325.95), change: dec!(3.12) },
    Listing { symbol: "NVDA", name: "NVIDIA Corporation", price: dec!(430.97), change: dec!(2.37) },
    Listing { symbol: "NFLX", name: "Netflix Inc.", price: dec!(485.13), change: dec!(-1.54) },
    Listing { symbol: "PYPL", name: "PayPal Holdings Inc.", price: dec!(64.42), change: dec!(-0.73) },
    Listing { symbol: "INTC", name: "Intel Corporation", price: dec!(43.32), change: dec!(0.28) },
];

/// A fully synthetic `PriceOracle` that needs no network at all.
///
/// Known symbols quote around a fixed listing table with a small per-call
/// jitter; unknown symbols get a plausible made-up quote, so every lookup
/// succeeds. Useful for demos, tests, and running the simulator offline.
#[derive(Debug, Clone, Default)]
pub struct SimulatedQuoteFeed;

impl SimulatedQuoteFeed {
    pub fn new() -> Self {
        Self
    }

    fn synthesize(&self, symbol: &str) -> Quote {
        let mut rng = rand::rng();
        match LISTINGS.iter().find(|l| l.symbol == symbol) {
            Some(listing) => {
                // Jitter of up to +/- 2.00 around the listed price, in cents.
                let cents: i64 = rng.random_range(-200..=200);
                let jitter = Decimal::new(cents, 2);
                let price = (listing.price + jitter).round_dp(2);
                let change = (listing.change + jitter / dec!(10)).round_dp(2);
                quote_from(symbol, listing.name.to_string(), price, change)
            }
            None => {
                // Unknown symbols still trade here: invent a quote in a
                // believable range rather than failing the lookup.
                let price = Decimal::new(rng.random_range(5000..=50000), 2);
                let change = Decimal::new(rng.random_range(-300..=300), 2);
                quote_from(symbol, format!("{} Inc.", symbol), price, change)
            }
        }
    }
}

fn quote_from(symbol: &str, name: String, price: Decimal, change: Decimal) -> Quote {
    // Day change relative to the implied previous close.
    let previous_close = price - change;
    Quote {
        symbol: symbol.to_string(),
        name,
        price,
        change,
        change_percent: (change / previous_close * dec!(100)).round_dp(2),
    }
}

#[async_trait]
impl PriceOracle for SimulatedQuoteFeed {
    async fn quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        Ok(self.synthesize(&symbol.to_uppercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listed_symbol_quotes_near_table_price() {
        let feed = SimulatedQuoteFeed::new();
        for _ in 0..50 {
            let quote = feed.quote("AAPL").await.unwrap();
            assert_eq!(quote.symbol, "AAPL");
            assert_eq!(quote.name, "Apple Inc.");
            assert!(quote.price >= dec!(179.75) && quote.price <= dec!(183.75));
            assert!(quote.price.scale() <= 2);
        }
    }

    #[tokio::test]
    async fn symbol_is_uppercased() {
        let feed = SimulatedQuoteFeed::new();
        let quote = feed.quote("msft").await.unwrap();
        assert_eq!(quote.symbol, "MSFT");
        assert_eq!(quote.name, "Microsoft Corporation");
    }

    #[tokio::test]
    async fn unknown_symbol_synthesizes_a_quote() {
        let feed = SimulatedQuoteFeed::new();
        let quote = feed.quote("ZZZT").await.unwrap();
        assert_eq!(quote.symbol, "ZZZT");
        assert_eq!(quote.name, "ZZZT Inc.");
        assert!(quote.price >= dec!(50) && quote.price <= dec!(500));
        assert!(quote.change >= dec!(-3) && quote.change <= dec!(3));
    }

    #[tokio::test]
    async fn change_percent_relates_change_to_previous_close() {
        let feed = SimulatedQuoteFeed::new();
        let quote = feed.quote("NVDA").await.unwrap();
        let expected = (quote.change / (quote.price - quote.change) * dec!(100)).round_dp(2);
        assert_eq!(quote.change_percent, expected);
    }
}
