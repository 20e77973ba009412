use market_data::{MarketDataError, PriceOracle, RemoteQuoteClient};
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fetches_and_parses_a_quote() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stock/AAPL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "symbol": "AAPL",
            "name": "Apple Inc.",
            "price": 181.75,
            "change": 1.25,
            "changePercent": 0.69
        })))
        .mount(&server)
        .await;

    let client = RemoteQuoteClient::new(server.uri());
    let quote = client.quote("AAPL").await.unwrap();

    assert_eq!(quote.symbol, "AAPL");
    assert_eq!(quote.name, "Apple Inc.");
    assert_eq!(quote.price, dec!(181.75));
    assert_eq!(quote.change, dec!(1.25));
    assert_eq!(quote.change_percent, dec!(0.69));
}

#[tokio::test]
async fn symbols_are_uppercased_in_the_request_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stock/MSFT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "symbol": "MSFT",
            "name": "Microsoft Corporation",
            "price": 339.50,
            "change": 0.75,
            "changePercent": 0.22
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = RemoteQuoteClient::new(server.uri());
    let quote = client.quote("msft").await.unwrap();
    assert_eq!(quote.symbol, "MSFT");
}

#[tokio::test]
async fn service_404_surfaces_as_not_found_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stock/ZZZZ"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = RemoteQuoteClient::new(server.uri());
    let err = client.quote("ZZZZ").await.unwrap_err();

    assert!(matches!(
        err,
        MarketDataError::Status { status: 404, ref symbol } if symbol == "ZZZZ"
    ));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn service_500_is_not_treated_as_unknown_symbol() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stock/AAPL"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = RemoteQuoteClient::new(server.uri());
    let err = client.quote("AAPL").await.unwrap_err();

    assert!(matches!(err, MarketDataError::Status { status: 500, .. }));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn malformed_body_is_a_deserialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stock/AAPL"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not a quote"))
        .mount(&server)
        .await;

    let client = RemoteQuoteClient::new(server.uri());
    let err = client.quote("AAPL").await.unwrap_err();

    assert!(matches!(err, MarketDataError::Deserialization(_)));
}
