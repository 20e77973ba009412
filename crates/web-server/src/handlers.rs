use crate::{error::AppError, AppState};
use account::{PortfolioView, TradeView};
use axum::{
    extract::{Path, State},
    Json,
};
use core_types::{OrderTicket, Quote, TradeSide};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// The body of a `POST /trade` request.
#[derive(Debug, Deserialize)]
pub struct TradeRequest {
    pub user_id: i64,
    pub symbol: String,
    /// `"buy"` or `"sell"`.
    pub action: TradeSide,
    pub quantity: Decimal,
}

/// The body of a successful `POST /trade` response.
#[derive(Debug, Serialize)]
pub struct TradeResponse {
    pub message: String,
    pub new_balance: Decimal,
}

/// # GET /
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to Paperbroker API" }))
}

/// # GET /stock/:symbol
/// Fetches a live quote. Delegates entirely to the price oracle.
pub async fn get_stock_quote(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Quote>, AppError> {
    let quote = state
        .oracle
        .quote(&symbol)
        .await
        .map_err(|source| AppError::Quote {
            symbol: symbol.to_uppercase(),
            source,
        })?;
    Ok(Json(quote))
}

/// # GET /my-portfolio/:owner_id
/// Returns cash plus live-priced positions, opening a fresh portfolio on
/// first contact.
pub async fn get_my_portfolio(
    Path(owner_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<PortfolioView>, AppError> {
    let view = state.service.portfolio_view(owner_id).await?;
    Ok(Json(view))
}

/// # GET /trade-history/:owner_id
/// Returns the owner's trade ledger, newest first.
pub async fn get_trade_history(
    Path(owner_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TradeView>>, AppError> {
    let history = state.service.trade_history(owner_id).await?;
    Ok(Json(history))
}

/// # POST /trade
/// Executes a market order at the current quote and returns the new cash
/// balance.
pub async fn execute_trade(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TradeRequest>,
) -> Result<Json<TradeResponse>, AppError> {
    let ticket = OrderTicket {
        symbol: request.symbol,
        side: request.action,
        quantity: request.quantity,
    };
    let receipt = state.service.submit_trade(request.user_id, &ticket).await?;

    Ok(Json(TradeResponse {
        message: "Trade executed successfully".to_string(),
        new_balance: receipt.new_balance,
    }))
}
