use account::AccountService;
use axum::{
    routing::{get, post},
    Router,
};
use configuration::{Config, QuoteProvider};
use ledger_store::{LedgerStore, MemoryLedgerStore, PgLedgerStore};
use market_data::{PriceOracle, RemoteQuoteClient, SimulatedQuoteFeed};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AccountService>,
    pub oracle: Arc<dyn PriceOracle>,
}

/// Builds the full application router.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(|| async { "OK" }))
        .route("/stock/:symbol", get(handlers::get_stock_quote))
        .route("/my-portfolio/:owner_id", get(handlers::get_my_portfolio))
        .route("/trade-history/:owner_id", get(handlers::get_trade_history))
        .route("/trade", post(handlers::execute_trade))
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// Wires the collaborators the configuration selects and runs the server.
///
/// `ephemeral` swaps the Postgres ledger for the in-memory one, so the
/// simulator can run without a database. All state is lost on exit.
pub async fn serve_from_config(config: &Config, ephemeral: bool) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let oracle = build_oracle(config)?;

    let store: Arc<dyn LedgerStore> = if ephemeral {
        tracing::warn!("using the in-memory ledger; portfolios are lost on exit");
        Arc::new(MemoryLedgerStore::new())
    } else {
        let pool = ledger_store::connect().await?;
        ledger_store::run_migrations(&pool).await?;
        Arc::new(PgLedgerStore::new(pool))
    };

    let service = Arc::new(AccountService::new(
        Arc::clone(&oracle),
        store,
        config.account.starting_cash,
    ));
    let state = Arc::new(AppState { service, oracle });

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    run_server(addr, state).await
}

/// Builds the price oracle the configuration names. Also used by the CLI
/// `quote` command, which wants the oracle without the server around it.
pub fn build_oracle(config: &Config) -> anyhow::Result<Arc<dyn PriceOracle>> {
    Ok(match config.market_data.provider {
        QuoteProvider::Simulated => {
            tracing::info!("quotes come from the in-process simulated feed");
            Arc::new(SimulatedQuoteFeed::new())
        }
        QuoteProvider::Remote => {
            let base_url = config.market_data.base_url.clone().ok_or_else(|| {
                anyhow::anyhow!("market_data.base_url is required when provider = \"remote\"")
            })?;
            tracing::info!(%base_url, "quotes come from the remote quote service");
            Arc::new(RemoteQuoteClient::new(base_url))
        }
    })
}

/// The main function to configure and run the web server.
pub async fn run_server(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = app(state);

    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
