use account::AccountError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use market_data::MarketDataError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Account error: {0}")]
    Account(#[from] AccountError),
    #[error("Quote error for {symbol}: {source}")]
    Quote {
        symbol: String,
        source: MarketDataError,
    },
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Engine rejections are the caller's fault (400); an unknown portfolio is
/// 404; a failing quote feed is 502 unless the feed itself reported the
/// symbol as unknown; store failures are 500 and never leak detail.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Account(AccountError::Engine(engine_err)) => {
                (StatusCode::BAD_REQUEST, engine_err.to_string())
            }
            AppError::Account(err @ AccountError::PortfolioNotFound(_)) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            AppError::Account(AccountError::PriceUnavailable { symbol, source }) => {
                quote_failure(&symbol, &source)
            }
            AppError::Account(AccountError::StoreUnavailable(store_err)) => {
                tracing::error!(error = ?store_err, "Ledger store error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal storage error occurred".to_string(),
                )
            }
            AppError::Quote { symbol, source } => quote_failure(&symbol, &source),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

fn quote_failure(symbol: &str, source: &MarketDataError) -> (StatusCode, String) {
    if source.is_not_found() {
        (
            StatusCode::NOT_FOUND,
            format!("Stock {symbol} not found"),
        )
    } else {
        tracing::error!(error = ?source, symbol, "Quote service error.");
        (
            StatusCode::BAD_GATEWAY,
            "The quote service is unavailable".to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::EngineError;
    use ledger_store::LedgerStoreError;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn engine_rejections_are_bad_requests() {
        let err = AppError::Account(AccountError::Engine(EngineError::NoSuchPosition(
            "TSLA".to_string(),
        )));
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_portfolio_is_not_found() {
        let err = AppError::Account(AccountError::PortfolioNotFound(7));
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unknown_symbol_from_the_feed_is_not_found() {
        let err = AppError::Quote {
            symbol: "ZZZZ".to_string(),
            source: MarketDataError::Status {
                symbol: "ZZZZ".to_string(),
                status: 404,
            },
        };
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn feed_outage_is_a_bad_gateway() {
        let err = AppError::Account(AccountError::PriceUnavailable {
            symbol: "AAPL".to_string(),
            source: MarketDataError::Status {
                symbol: "AAPL".to_string(),
                status: 503,
            },
        });
        assert_eq!(status_of(err), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn store_failures_are_internal_errors() {
        let err = AppError::Account(AccountError::StoreUnavailable(
            LedgerStoreError::ConnectionConfig("DATABASE_URL must be set.".to_string()),
        ));
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
