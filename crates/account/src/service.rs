use crate::error::AccountError;
use crate::view::{PortfolioView, PositionView, TradeReceipt, TradeView};
use core_types::{OrderTicket, Portfolio};
use ledger_store::LedgerStore;
use market_data::PriceOracle;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The central orchestrator for portfolio requests.
///
/// Wires the price oracle, the ledger store, and the settlement engine
/// together behind the operations the HTTP shell exposes.
pub struct AccountService {
    oracle: Arc<dyn PriceOracle>,
    store: Arc<dyn LedgerStore>,
    starting_cash: Decimal,
    // One mutex per owner serializes the load-validate-apply-persist cycle.
    locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl AccountService {
    /// Creates a new `AccountService` with all its required collaborators.
    pub fn new(
        oracle: Arc<dyn PriceOracle>,
        store: Arc<dyn LedgerStore>,
        starting_cash: Decimal,
    ) -> Self {
        Self {
            oracle,
            store,
            starting_cash,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Loads the portfolio for `owner_id`, opening a fresh one with the
    /// configured starting cash on first contact.
    pub async fn get_or_create_portfolio(&self, owner_id: i64) -> Result<Portfolio, AccountError> {
        let lock = self.lock_for(owner_id).await;
        let _guard = lock.lock().await;
        self.load_or_open(owner_id).await
    }

    /// Assembles the live view: cash plus each position priced at its
    /// current quote. A position whose quote cannot be fetched is skipped
    /// and logged; the view is best-effort, not transactional.
    pub async fn portfolio_view(&self, owner_id: i64) -> Result<PortfolioView, AccountError> {
        let portfolio = self.get_or_create_portfolio(owner_id).await?;
        let held = self.store.positions(portfolio.id).await?;

        let mut positions = Vec::with_capacity(held.len());
        for position in &held {
            match self.oracle.quote(&position.symbol).await {
                Ok(quote) => positions.push(PositionView::from_quote(position, &quote)),
                Err(error) => {
                    tracing::warn!(
                        symbol = %position.symbol,
                        %error,
                        "skipping position without a quote"
                    );
                }
            }
        }

        Ok(PortfolioView {
            cash: portfolio.cash,
            positions,
        })
    }

    /// Returns the owner's ledger newest-first, opening a portfolio on
    /// first contact for symmetry with the portfolio view.
    pub async fn trade_history(&self, owner_id: i64) -> Result<Vec<TradeView>, AccountError> {
        let portfolio = self.get_or_create_portfolio(owner_id).await?;
        let trades = self.store.trades(portfolio.id).await?;
        Ok(trades.into_iter().map(TradeView::from).collect())
    }

    /// Executes a market order against the owner's portfolio.
    ///
    /// The quote is resolved before the portfolio lock is taken, so a slow
    /// or unreliable quote service never stalls other requests for the
    /// same owner. Owners without a portfolio are rejected; trading does
    /// not open accounts.
    pub async fn submit_trade(
        &self,
        owner_id: i64,
        ticket: &OrderTicket,
    ) -> Result<TradeReceipt, AccountError> {
        let symbol = ticket.symbol.to_uppercase();
        let quote = self
            .oracle
            .quote(&symbol)
            .await
            .map_err(|source| AccountError::PriceUnavailable {
                symbol: symbol.clone(),
                source,
            })?;
        let ticket = OrderTicket {
            symbol,
            side: ticket.side,
            quantity: ticket.quantity,
        };

        let lock = self.lock_for(owner_id).await;
        let _guard = lock.lock().await;

        let portfolio = self
            .store
            .find_portfolio(owner_id)
            .await?
            .ok_or(AccountError::PortfolioNotFound(owner_id))?;
        let position = self.store.position(portfolio.id, &ticket.symbol).await?;

        let outcome = engine::execute(&portfolio, position.as_ref(), &ticket, quote.price)?;
        self.store.commit_trade(&outcome).await?;

        tracing::info!(
            owner_id,
            symbol = %outcome.trade.symbol,
            side = %outcome.trade.side,
            quantity = %outcome.trade.quantity,
            price = %outcome.trade.price,
            "trade committed"
        );

        Ok(TradeReceipt {
            new_balance: outcome.portfolio.cash,
            trade: outcome.trade,
        })
    }

    async fn load_or_open(&self, owner_id: i64) -> Result<Portfolio, AccountError> {
        if let Some(portfolio) = self.store.find_portfolio(owner_id).await? {
            return Ok(portfolio);
        }

        let portfolio = Portfolio::new(owner_id, self.starting_cash);
        self.store.create_portfolio(&portfolio).await?;
        tracing::info!(owner_id, cash = %portfolio.cash, "opened a new portfolio");
        Ok(portfolio)
    }

    /// Returns the per-owner lock, creating it on first use.
    async fn lock_for(&self, owner_id: i64) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(owner_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
