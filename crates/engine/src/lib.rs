//! # Paperbroker Engine Crate
//!
//! This crate is the trade-execution core: given a portfolio snapshot, the
//! (optional) existing position for a symbol, an order ticket, and an
//! execution price, it decides whether the order is valid and computes the
//! complete post-trade state.
//!
//! ## Architectural Principles
//!
//! - **Validate, then build:** every rejection happens before any piece of
//!   the outcome is constructed, so a failed order can never leave partial
//!   state behind. The engine does not mutate its inputs at all; it returns
//!   the next state as a value and leaves applying it to the ledger store.
//! - **No hidden collaborators:** the execution price arrives as an
//!   argument. Price discovery, locking, and persistence are the account
//!   service's job, which keeps this crate synchronous and trivially
//!   testable.
//!
//! ## Public API
//!
//! - `execute`: the single entry point, one order in, one `TradeOutcome` out.
//! - `TradeOutcome` / `PositionChange`: the atomic commit unit for the store.
//! - `EngineError`: the typed rejection reasons (invalid order, insufficient
//!   funds, insufficient shares, no such position).

// Declare the modules that constitute this crate.
pub mod error;
pub mod execution;

// Re-export the key components to provide a clean, public-facing API.
pub use error::EngineError;
pub use execution::{execute, PositionChange, TradeOutcome};
