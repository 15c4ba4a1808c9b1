//! CLI argument definitions for Tickerlens.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `resolve` | Resolve the queries given as arguments |
//! | `batch` | Resolve newline-separated queries read from stdin |
//!
//! Results are printed to stdout as one JSON object per line. Logs go to
//! stderr.
//!
//! # Examples
//!
//! ```bash
//! tickerlens resolve "Nvidia, Inc." nvda "berkshire hathaway"
//! tickerlens resolve shopify --exchange NYSE --provider finnhub --stats
//! cat companies.txt | tickerlens batch --force-refresh
//! ```

use clap::{Args, Parser, Subcommand};
use tickerlens_resolver::{ProviderSelection, ResolveOptions};

/// Tickerlens - resolve company names to stock tickers
#[derive(Debug, Parser)]
#[command(name = "tickerlens", version, about = "Resolve company names to stock tickers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve one or more queries.
    Resolve(ResolveArgs),
    /// Resolve newline-separated queries from stdin.
    Batch(ResolutionArgs),
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Company names or tickers to resolve.
    #[arg(required = true)]
    pub queries: Vec<String>,

    #[command(flatten)]
    pub resolution: ResolutionArgs,
}

/// Options shared by every command.
#[derive(Debug, Args)]
pub struct ResolutionArgs {
    /// Prefer listings on this exchange (e.g. NASDAQ).
    #[arg(long)]
    pub exchange: Option<String>,

    /// Provider to query: auto, fmp, finnhub or alpha_vantage.
    #[arg(long, default_value = "auto")]
    pub provider: ProviderSelection,

    /// Ignore cached results.
    #[arg(long, default_value_t = false)]
    pub force_refresh: bool,

    /// Print cache statistics after resolving.
    #[arg(long, default_value_t = false)]
    pub stats: bool,
}

impl ResolutionArgs {
    pub fn options(&self) -> ResolveOptions {
        let options = ResolveOptions::default()
            .with_provider(self.provider)
            .with_force_refresh(self.force_refresh);
        match &self.exchange {
            Some(exchange) => options.with_exchange(exchange.as_str()),
            None => options,
        }
    }
}
