use clap::{Parser, Subcommand};
use configuration::Config;
use tracing_subscriber::EnvFilter;

/// The main entry point for the Paperbroker application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if one exists.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();
    let config = configuration::load_config()?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => web_server::serve_from_config(&config, args.ephemeral).await,
        Commands::Quote(args) => handle_quote(&config, &args.symbol).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A paper-trading simulator: virtual cash, live-ish quotes, real ledger.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server.
    Serve(ServeArgs),
    /// Fetch a single quote and print it as JSON.
    Quote(QuoteArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Use the in-memory ledger instead of Postgres. State is lost on exit.
    #[arg(long)]
    ephemeral: bool,
}

#[derive(Parser)]
struct QuoteArgs {
    /// The stock symbol to quote (e.g., "AAPL").
    #[arg(long)]
    symbol: String,
}

// ==============================================================================
// Quote Command Logic
// ==============================================================================

/// Resolves a quote through whichever oracle the configuration names and
/// prints it the way the API would return it.
async fn handle_quote(config: &Config, symbol: &str) -> anyhow::Result<()> {
    let oracle = web_server::build_oracle(config)?;
    let quote = oracle.quote(symbol).await?;
    println!("{}", serde_json::to_string_pretty(&quote)?);
    Ok(())
}
