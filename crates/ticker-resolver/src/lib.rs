//! Tickerlens Resolver Crate
//!
//! This crate maps free-form user queries ("Nvidia, Inc.", "nvda",
//! "berkshire") to canonical stock tickers with a confidence score and a
//! record of which strategy produced the answer.
//!
//! # Overview
//!
//! The resolver supports:
//! - Direct ticker detection ("NVDA", "brk.b")
//! - A seeded, runtime-extensible catalog of company names
//! - External symbol search: Financial Modeling Prep, Finnhub, Alpha Vantage
//! - Approximate matching against the catalog
//! - An optional chat-completion fallback
//! - A TTL cache of successful resolutions
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |   Raw query      |  "Nvidia, Inc."
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |   Normalizer     | --> |  NormalizedKey   |  "nvidiainc"
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  TickerResolver  |  (cache, catalog, providers,
//!                          +------------------+   fuzzy, AI fallback)
//!                                  |
//!                                  v
//!                          +------------------+
//!                          | ResolutionResult |  (resolved / ambiguous /
//!                          +------------------+   not found + telemetry)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use tickerlens_resolver::{ResolveOptions, ResolverConfig, TickerResolver};
//!
//! let resolver = TickerResolver::from_config(&ResolverConfig::from_env()?)?;
//! let result = resolver.resolve("Nvidia, Inc.", &ResolveOptions::default()).await;
//! assert_eq!(result.ticker(), Some("NVDA"));
//! ```

pub mod ai;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod fuzzy;
pub mod models;
pub mod normalize;
pub mod provider;
pub mod resolver;

pub use errors::ResolverError;

pub use models::{
    CandidateSummary, ResolutionOutcome, ResolutionResult, ResolvedFrom, SymbolRecord,
    TelemetryEvent, TelemetryKind,
};

pub use resolver::{ResolveOptions, TickerResolver, TickerResolverBuilder};

pub use config::ResolverConfig;

pub use cache::{CacheEntryStats, CacheStats, Clock, ManualClock, SystemClock};
pub use catalog::SymbolCatalog;

pub use ai::openai::OpenAiFallback;
pub use ai::{AiFallback, AiGuess};

pub use provider::alpha_vantage::AlphaVantageProvider;
pub use provider::finnhub::FinnhubProvider;
pub use provider::fmp::FmpProvider;
pub use provider::{ProviderKind, ProviderSelection, SymbolSearchProvider};
