//! Resolution pipeline: free-form query in, ticker out.
//!
//! # Architecture
//!
//! Each call walks a fixed sequence of strategies and stops at the first one
//! that produces an answer:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TickerResolver                          │
//! │                                                              │
//! │  1. Ticker detection    "nvda", "N V D A"  -> NVDA (1.0)     │
//! │           │ miss                                             │
//! │  2. Resolution cache    keyed by normalized query            │
//! │           │ miss / force_refresh                             │
//! │  3. Symbol catalog      exact key, optional exchange filter  │
//! │           │ miss                                             │
//! │  4. Providers           fmp -> finnhub -> alpha_vantage      │
//! │           │ no candidates                                    │
//! │  5. Fuzzy match         catalog keys by edit distance        │
//! │           │ no matches                                       │
//! │  6. AI fallback         chat-completion guess                │
//! │           │ no guess                                         │
//! │  7. Not found                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only single answers (resolved outcomes) are written to the cache.
//! Ambiguous and not-found outcomes are recomputed on every call.
//!
//! Every exit path produces exactly one [`TelemetryEvent`], which is attached
//! to the result and emitted to the structured log.

mod builder;
mod options;

pub use builder::TickerResolverBuilder;
pub use options::ResolveOptions;

use std::sync::Arc;

use log::debug;

use crate::ai::AiFallback;
use crate::cache::{CacheStats, ResolutionCache};
use crate::catalog::SymbolCatalog;
use crate::errors::Result;
use crate::fuzzy::find_matches;
use crate::models::{
    ResolutionOutcome, ResolutionResult, ResolvedFrom, SymbolRecord, TelemetryEvent, TelemetryKind,
};
use crate::normalize::{normalize, ticker_candidate};
use crate::provider::{ProviderKind, SymbolSearchProvider};

/// Resolves company names and ticker-like queries to canonical tickers.
///
/// Cheap to share: wrap it in an `Arc` and call [`resolve`](Self::resolve)
/// from as many tasks as needed.
pub struct TickerResolver {
    catalog: SymbolCatalog,
    cache: ResolutionCache,
    providers: Vec<Arc<dyn SymbolSearchProvider>>,
    ai: Option<Arc<dyn AiFallback>>,
    fuzzy_threshold: f64,
    confident_match_threshold: f64,
}

impl TickerResolver {
    /// Resolve `input` to a ticker.
    ///
    /// Never fails: "nothing matched" and "several things matched" are
    /// outcomes on the returned [`ResolutionResult`].
    pub async fn resolve(&self, input: &str, options: &ResolveOptions) -> ResolutionResult {
        if let Some(ticker) = ticker_candidate(input) {
            let outcome = ResolutionOutcome::Resolved {
                symbol: SymbolRecord::new(ticker, None, 1.0),
                resolved_from: ResolvedFrom::InputDetection,
            };
            return self.finish(input, TelemetryKind::DetectedTicker, outcome);
        }

        let key = normalize(input);
        if key.is_empty() {
            debug!("Query '{}' is empty after normalization", input);
            return self.finish(input, TelemetryKind::SymbolNotFound, ResolutionOutcome::NotFound);
        }

        if !options.force_refresh {
            if let Some(cached) = self.cache.get(&key) {
                debug!("Cache hit for '{}' ({})", key, cached.resolved_from());
                return self.finish(input, TelemetryKind::CacheHit, cached.outcome);
            }
        }

        let exchange = options.exchange.as_deref();

        if let Some(symbol) = self.catalog.lookup(&key, exchange) {
            let outcome = ResolutionOutcome::Resolved {
                symbol,
                resolved_from: ResolvedFrom::LocalCache,
            };
            return self.finish_cached(input, &key, outcome);
        }

        if let Some((kind, candidates)) = self.search_providers(input.trim(), options).await {
            let mut candidates = prefer_exchange(candidates, exchange);
            candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

            let resolved_from = ResolvedFrom::Provider(kind);
            return if candidates.len() == 1 {
                let outcome = ResolutionOutcome::Resolved {
                    symbol: candidates.remove(0),
                    resolved_from,
                };
                self.finish_cached(input, &key, outcome)
            } else {
                let outcome = ResolutionOutcome::Ambiguous {
                    candidates,
                    resolved_from,
                };
                self.finish(input, TelemetryKind::SymbolAmbiguous, outcome)
            };
        }

        let mut matches = find_matches(&self.catalog, &key, self.fuzzy_threshold);
        if !matches.is_empty() {
            debug!("{} fuzzy matches for '{}'", matches.len(), key);
            return if matches.len() == 1 && matches[0].confidence > self.confident_match_threshold {
                let outcome = ResolutionOutcome::Resolved {
                    symbol: matches.remove(0),
                    resolved_from: ResolvedFrom::FuzzyMatch,
                };
                self.finish_cached(input, &key, outcome)
            } else {
                let outcome = ResolutionOutcome::Ambiguous {
                    candidates: matches,
                    resolved_from: ResolvedFrom::FuzzyMatch,
                };
                self.finish(input, TelemetryKind::SymbolAmbiguous, outcome)
            };
        }

        if let Some(ai) = &self.ai {
            if let Some(guess) = ai.resolve(input.trim()).await {
                let outcome = ResolutionOutcome::Resolved {
                    symbol: SymbolRecord::new(guess.ticker, None, guess.confidence)
                        .with_name(guess.company_name),
                    resolved_from: ResolvedFrom::OpenAi,
                };
                return self.finish_cached(input, &key, outcome);
            }
        }

        self.finish(input, TelemetryKind::SymbolNotFound, ResolutionOutcome::NotFound)
    }

    /// Ask each allowed provider in turn; the first with candidates wins.
    async fn search_providers(
        &self,
        query: &str,
        options: &ResolveOptions,
    ) -> Option<(ProviderKind, Vec<SymbolRecord>)> {
        for provider in &self.providers {
            let kind = provider.kind();
            if !options.provider.allows(kind) {
                continue;
            }

            match provider.lookup(query).await {
                Some(candidates) if !candidates.is_empty() => return Some((kind, candidates)),
                _ => debug!("Provider '{}' had nothing for '{}'", kind, query),
            }
        }
        None
    }

    fn finish(&self, input: &str, kind: TelemetryKind, outcome: ResolutionOutcome) -> ResolutionResult {
        let telemetry = TelemetryEvent::new(kind, input, &outcome, self.cache.now());
        telemetry.emit();
        ResolutionResult {
            input: input.to_string(),
            outcome,
            telemetry,
        }
    }

    /// Finish with a resolved outcome and write it through to the cache.
    fn finish_cached(&self, input: &str, key: &str, outcome: ResolutionOutcome) -> ResolutionResult {
        let result = self.finish(input, TelemetryKind::SymbolResolved, outcome);
        self.cache.set(key, result.clone());
        result
    }

    /// Drop one cached entry (the key is normalized first), or all of them.
    pub fn clear_cache(&self, key: Option<&str>) {
        match key {
            Some(raw) => self.cache.clear(Some(&normalize(raw))),
            None => self.cache.clear(None),
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Add or replace a catalog mapping.
    ///
    /// Any cached resolution for the same key is dropped so the new mapping
    /// takes effect immediately.
    pub fn add_mapping(&self, name: &str, ticker: &str, exchange: &str, confidence: f64) -> Result<()> {
        self.catalog.add(name, ticker, exchange, confidence)?;
        self.cache.clear(Some(&normalize(name)));
        debug!("Added catalog mapping '{}' -> {}", name, ticker.trim().to_uppercase());
        Ok(())
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }
}

/// Keep only candidates on `exchange`, unless that would leave none.
fn prefer_exchange(candidates: Vec<SymbolRecord>, exchange: Option<&str>) -> Vec<SymbolRecord> {
    let Some(exchange) = exchange else {
        return candidates;
    };

    let on_exchange: Vec<SymbolRecord> = candidates
        .iter()
        .filter(|c| c.trades_on(exchange))
        .cloned()
        .collect();

    if on_exchange.is_empty() {
        debug!("No candidate trades on {}, keeping all {}", exchange, candidates.len());
        candidates
    } else {
        on_exchange
    }
}
