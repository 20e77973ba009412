use crate::error::StoreError;
use crate::LedgerStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{Portfolio, Position, Trade, TradeSide};
use engine::{PositionChange, TradeOutcome};
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// The `PgLedgerStore` provides the Postgres-backed implementation of the
/// ledger. It encapsulates all SQL queries and data access logic; callers
/// only ever see domain types, never rows.
#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

/// Row shape of the `portfolios` table.
#[derive(Debug, Clone, FromRow)]
struct PortfolioRow {
    id: Uuid,
    owner_id: i64,
    cash: Decimal,
}

impl From<PortfolioRow> for Portfolio {
    fn from(row: PortfolioRow) -> Self {
        Portfolio {
            id: row.id,
            owner_id: row.owner_id,
            cash: row.cash,
        }
    }
}

/// Row shape of the `positions` table.
#[derive(Debug, Clone, FromRow)]
struct PositionRow {
    portfolio_id: Uuid,
    symbol: String,
    quantity: Decimal,
    average_price: Decimal,
}

impl From<PositionRow> for Position {
    fn from(row: PositionRow) -> Self {
        Position {
            portfolio_id: row.portfolio_id,
            symbol: row.symbol,
            quantity: row.quantity,
            average_price: row.average_price,
        }
    }
}

/// Row shape of the `trades` table. The side is stored as TEXT and parsed
/// back into the domain enum on the way out.
#[derive(Debug, Clone, FromRow)]
struct TradeRow {
    id: Uuid,
    portfolio_id: Uuid,
    symbol: String,
    side: String,
    quantity: Decimal,
    price: Decimal,
    executed_at: DateTime<Utc>,
}

impl TryFrom<TradeRow> for Trade {
    type Error = StoreError;

    fn try_from(row: TradeRow) -> Result<Self, Self::Error> {
        Ok(Trade {
            id: row.id,
            portfolio_id: row.portfolio_id,
            symbol: row.symbol,
            side: TradeSide::from_str(&row.side)?,
            quantity: row.quantity,
            price: row.price,
            executed_at: row.executed_at,
        })
    }
}

impl PgLedgerStore {
    /// Creates a new `PgLedgerStore` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn find_portfolio(&self, owner_id: i64) -> Result<Option<Portfolio>, StoreError> {
        let row = sqlx::query_as::<_, PortfolioRow>(
            "SELECT id, owner_id, cash FROM portfolios WHERE owner_id = $1",
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Portfolio::from))
    }

    async fn create_portfolio(&self, portfolio: &Portfolio) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO portfolios (id, owner_id, cash) VALUES ($1, $2, $3)")
            .bind(portfolio.id)
            .bind(portfolio.owner_id)
            .bind(portfolio.cash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn position(
        &self,
        portfolio_id: Uuid,
        symbol: &str,
    ) -> Result<Option<Position>, StoreError> {
        let row = sqlx::query_as::<_, PositionRow>(
            r#"
            SELECT portfolio_id, symbol, quantity, average_price
            FROM positions
            WHERE portfolio_id = $1 AND symbol = $2
            "#,
        )
        .bind(portfolio_id)
        .bind(symbol)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Position::from))
    }

    async fn positions(&self, portfolio_id: Uuid) -> Result<Vec<Position>, StoreError> {
        let rows = sqlx::query_as::<_, PositionRow>(
            r#"
            SELECT portfolio_id, symbol, quantity, average_price
            FROM positions
            WHERE portfolio_id = $1
            ORDER BY symbol ASC
            "#,
        )
        .bind(portfolio_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Position::from).collect())
    }

    async fn trades(&self, portfolio_id: Uuid) -> Result<Vec<Trade>, StoreError> {
        let rows = sqlx::query_as::<_, TradeRow>(
            r#"
            SELECT id, portfolio_id, symbol, side, quantity, price, executed_at
            FROM trades
            WHERE portfolio_id = $1
            ORDER BY executed_at DESC
            "#,
        )
        .bind(portfolio_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Trade::try_from).collect()
    }

    /// Persists a settled trade within a single transaction for atomicity.
    async fn commit_trade(&self, outcome: &TradeOutcome) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE portfolios SET cash = $1 WHERE id = $2")
            .bind(outcome.portfolio.cash)
            .bind(outcome.portfolio.id)
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(StoreError::UnknownPortfolio(outcome.portfolio.id));
        }

        match &outcome.position {
            PositionChange::Upsert(position) => {
                sqlx::query(
                    r#"
                    INSERT INTO positions (portfolio_id, symbol, quantity, average_price)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (portfolio_id, symbol)
                    DO UPDATE SET quantity = EXCLUDED.quantity, average_price = EXCLUDED.average_price
                    "#,
                )
                .bind(position.portfolio_id)
                .bind(&position.symbol)
                .bind(position.quantity)
                .bind(position.average_price)
                .execute(&mut *tx)
                .await?;
            }
            PositionChange::Remove {
                portfolio_id,
                symbol,
            } => {
                sqlx::query("DELETE FROM positions WHERE portfolio_id = $1 AND symbol = $2")
                    .bind(portfolio_id)
                    .bind(symbol)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        sqlx::query(
            r#"
            INSERT INTO trades (id, portfolio_id, symbol, side, quantity, price, executed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(outcome.trade.id)
        .bind(outcome.trade.portfolio_id)
        .bind(&outcome.trade.symbol)
        .bind(outcome.trade.side.to_string())
        .bind(outcome.trade.quantity)
        .bind(outcome.trade.price)
        .bind(outcome.trade.executed_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(
            trade_id = %outcome.trade.id,
            portfolio_id = %outcome.trade.portfolio_id,
            "Trade transaction committed."
        );
        Ok(())
    }
}
