//! # Paperbroker Ledger Store Crate
//!
//! This crate is the durable home of every portfolio, position, and trade.
//! It is the system's "permanent archive."
//!
//! ## Architectural Principles
//!
//! - **Store as a collaborator:** everything goes through the `LedgerStore`
//!   trait, so the account service never knows whether it is talking to
//!   Postgres or to the in-memory store used by tests and ephemeral runs.
//!   Records are loaded by key and saved back as plain values; there is no
//!   live object graph and no process-wide mutable map.
//! - **Atomic commits:** a trade is persisted through `commit_trade`, which
//!   applies the cash update, the position upsert/removal, and the ledger
//!   append together or not at all.
//! - **Asynchronous & Pooled:** the Postgres implementation uses a shared
//!   `PgPool` and runtime-checked queries; migrations are applied at
//!   startup via `run_migrations`.
//!
//! ## Public API
//!
//! - `LedgerStore`: the storage contract.
//! - `PgLedgerStore` / `MemoryLedgerStore`: the two implementations.
//! - `connect` / `run_migrations`: Postgres pool setup helpers.
//! - `StoreError`: the specific error types that can be returned from this crate.

use async_trait::async_trait;
use core_types::{Portfolio, Position, Trade};
use engine::TradeOutcome;
use uuid::Uuid;

use crate::error::StoreError;

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod memory;
pub mod postgres;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::StoreError as LedgerStoreError;
pub use memory::MemoryLedgerStore;
pub use postgres::PgLedgerStore;

/// Durable keyed storage for portfolios, their positions, and their
/// append-only trade ledger.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Loads the portfolio owned by `owner_id`, if one exists.
    async fn find_portfolio(&self, owner_id: i64) -> Result<Option<Portfolio>, StoreError>;

    /// Persists a brand-new portfolio. Owners hold at most one portfolio;
    /// callers are expected to check `find_portfolio` first.
    async fn create_portfolio(&self, portfolio: &Portfolio) -> Result<(), StoreError>;

    /// Loads the position a portfolio holds in `symbol`, if any.
    async fn position(
        &self,
        portfolio_id: Uuid,
        symbol: &str,
    ) -> Result<Option<Position>, StoreError>;

    /// Loads all open positions of a portfolio, ordered by symbol.
    async fn positions(&self, portfolio_id: Uuid) -> Result<Vec<Position>, StoreError>;

    /// Loads the trade ledger of a portfolio, newest first.
    async fn trades(&self, portfolio_id: Uuid) -> Result<Vec<Trade>, StoreError>;

    /// Applies a settled trade atomically: the new cash balance, the
    /// position change, and the appended trade commit together or not at
    /// all.
    async fn commit_trade(&self, outcome: &TradeOutcome) -> Result<(), StoreError>;
}
