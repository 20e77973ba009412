use crate::error::StoreError;
use crate::LedgerStore;
use async_trait::async_trait;
use core_types::{Portfolio, Position, Trade};
use engine::{PositionChange, TradeOutcome};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory ledger for tests and `--ephemeral` runs. State lives for the
/// lifetime of the process and vanishes with it.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    portfolios: HashMap<Uuid, Portfolio>,
    // owner_id -> portfolio id, the moral equivalent of the UNIQUE index.
    owners: HashMap<i64, Uuid>,
    positions: HashMap<(Uuid, String), Position>,
    // Stored oldest first; read out newest first.
    trades: HashMap<Uuid, Vec<Trade>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn find_portfolio(&self, owner_id: i64) -> Result<Option<Portfolio>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .owners
            .get(&owner_id)
            .and_then(|id| inner.portfolios.get(id))
            .cloned())
    }

    async fn create_portfolio(&self, portfolio: &Portfolio) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.owners.insert(portfolio.owner_id, portfolio.id);
        inner.portfolios.insert(portfolio.id, portfolio.clone());
        inner.trades.entry(portfolio.id).or_default();
        Ok(())
    }

    async fn position(
        &self,
        portfolio_id: Uuid,
        symbol: &str,
    ) -> Result<Option<Position>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .positions
            .get(&(portfolio_id, symbol.to_string()))
            .cloned())
    }

    async fn positions(&self, portfolio_id: Uuid) -> Result<Vec<Position>, StoreError> {
        let inner = self.inner.read().await;
        let mut held: Vec<Position> = inner
            .positions
            .values()
            .filter(|position| position.portfolio_id == portfolio_id)
            .cloned()
            .collect();
        held.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(held)
    }

    async fn trades(&self, portfolio_id: Uuid) -> Result<Vec<Trade>, StoreError> {
        let inner = self.inner.read().await;
        let mut ledger = inner.trades.get(&portfolio_id).cloned().unwrap_or_default();
        ledger.reverse();
        Ok(ledger)
    }

    async fn commit_trade(&self, outcome: &TradeOutcome) -> Result<(), StoreError> {
        // One write-lock section, so the cash update, position change, and
        // ledger append land together or not at all.
        let mut inner = self.inner.write().await;
        if !inner.portfolios.contains_key(&outcome.portfolio.id) {
            return Err(StoreError::UnknownPortfolio(outcome.portfolio.id));
        }

        inner
            .portfolios
            .insert(outcome.portfolio.id, outcome.portfolio.clone());

        match &outcome.position {
            PositionChange::Upsert(position) => {
                inner.positions.insert(
                    (position.portfolio_id, position.symbol.clone()),
                    position.clone(),
                );
            }
            PositionChange::Remove {
                portfolio_id,
                symbol,
            } => {
                inner.positions.remove(&(*portfolio_id, symbol.clone()));
            }
        }

        inner
            .trades
            .entry(outcome.trade.portfolio_id)
            .or_default()
            .push(outcome.trade.clone());

        Ok(())
    }
}
