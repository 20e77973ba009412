//! # Paperbroker Account Crate
//!
//! The account service is the orchestrator of the system: it answers the
//! portfolio, history, and trade requests the HTTP shell receives, by
//! wiring together its three collaborators.
//!
//! ## Architectural Principles
//!
//! - **Collaborators behind traits:** prices come from a `PriceOracle`
//!   and storage goes through a `LedgerStore`; the service never knows
//!   which implementation it holds.
//! - **Settlement stays pure:** the arithmetic and the invariants live in
//!   the `engine` crate. This crate only loads state, hands it to the
//!   engine, and commits what comes back.
//! - **Per-owner serialization:** concurrent trades against one portfolio
//!   are serialized by an owner-keyed async mutex, so the read-modify-write
//!   of cash and quantity never interleaves. Quotes are fetched before the
//!   lock is taken.

pub mod error;
pub mod service;
pub mod view;

pub use error::AccountError;
pub use service::AccountService;
pub use view::{PortfolioView, PositionView, TradeReceipt, TradeView};
