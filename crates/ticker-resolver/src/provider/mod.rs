//! External symbol-search providers.
//!
//! This module contains:
//! - The `SymbolSearchProvider` trait that every adapter implements
//! - `ProviderKind` / `ProviderSelection`, the tagged configuration values used
//!   to pick adapters
//! - Concrete adapters (Financial Modeling Prep, Finnhub, Alpha Vantage)
//!
//! # Failure model
//!
//! Adapters are fail-silent. A missing credential disables an adapter, and any
//! network or parsing failure is logged and turned into "no answer" at the
//! adapter boundary so the resolver simply moves on to its next strategy.

pub(crate) mod http;
mod kind;
mod traits;

pub mod alpha_vantage;
pub mod finnhub;
pub mod fmp;

pub use kind::{ProviderKind, ProviderSelection};
pub use traits::SymbolSearchProvider;

use crate::models::SymbolRecord;
use crate::normalize::is_ticker_shaped;

/// Map one provider search hit into the common candidate shape.
///
/// Symbols that are not canonical tickers (index codes, numeric listings,
/// dash-separated share classes) are dropped.
pub(crate) fn candidate_from(
    symbol: &str,
    name: Option<&str>,
    exchange: Option<&str>,
    confidence: f64,
) -> Option<SymbolRecord> {
    let symbol = symbol.trim();
    if !is_ticker_shaped(symbol) {
        return None;
    }

    let record = SymbolRecord::new(symbol, exchange.map(str::to_string), confidence);
    Some(match name {
        Some(name) => record.with_name(name),
        None => record,
    })
}
