//! Construction of [`TickerResolver`].

use std::sync::Arc;

use log::{info, warn};

use super::TickerResolver;
use crate::ai::openai::OpenAiFallback;
use crate::ai::AiFallback;
use crate::cache::{Clock, ResolutionCache, SystemClock};
use crate::catalog::SymbolCatalog;
use crate::config::ResolverConfig;
use crate::errors::{ResolverError, Result};
use crate::fuzzy::{CONFIDENT_MATCH_THRESHOLD, DEFAULT_FUZZY_THRESHOLD};
use crate::provider::alpha_vantage::AlphaVantageProvider;
use crate::provider::finnhub::FinnhubProvider;
use crate::provider::fmp::FmpProvider;
use crate::provider::{ProviderKind, SymbolSearchProvider};

/// Builder for [`TickerResolver`].
///
/// Defaults: seeded catalog, no providers, no AI fallback, wall clock, 24h
/// cache TTL and the standard fuzzy thresholds.
pub struct TickerResolverBuilder {
    catalog: Option<SymbolCatalog>,
    providers: Vec<Arc<dyn SymbolSearchProvider>>,
    ai: Option<Arc<dyn AiFallback>>,
    clock: Arc<dyn Clock>,
    cache_ttl: std::time::Duration,
    fuzzy_threshold: f64,
    confident_match_threshold: f64,
}

impl Default for TickerResolverBuilder {
    fn default() -> Self {
        let defaults = ResolverConfig::default();
        Self {
            catalog: None,
            providers: Vec::new(),
            ai: None,
            clock: Arc::new(SystemClock),
            cache_ttl: defaults.cache_ttl,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            confident_match_threshold: CONFIDENT_MATCH_THRESHOLD,
        }
    }
}

impl TickerResolverBuilder {
    /// Use `catalog` instead of the seeded one.
    pub fn catalog(mut self, catalog: SymbolCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Append an external provider. Providers are tried in insertion order.
    pub fn provider(mut self, provider: Arc<dyn SymbolSearchProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn ai_fallback(mut self, ai: Arc<dyn AiFallback>) -> Self {
        self.ai = Some(ai);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn cache_ttl(mut self, ttl: std::time::Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    pub fn confident_match_threshold(mut self, threshold: f64) -> Self {
        self.confident_match_threshold = threshold;
        self
    }

    /// Build the resolver.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for thresholds outside `[0, 1]` or an unrepresentable
    /// TTL, `CatalogLoad` if the seed catalog is needed and fails to load.
    pub fn build(self) -> Result<TickerResolver> {
        for (name, value) in [
            ("fuzzy threshold", self.fuzzy_threshold),
            ("confident match threshold", self.confident_match_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ResolverError::invalid_config(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }

        let ttl = chrono::Duration::from_std(self.cache_ttl)
            .map_err(|e| ResolverError::invalid_config(format!("cache TTL out of range: {}", e)))?;

        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => SymbolCatalog::seeded()?,
        };

        Ok(TickerResolver {
            catalog,
            cache: ResolutionCache::with_clock(ttl, self.clock),
            providers: self.providers,
            ai: self.ai,
            fuzzy_threshold: self.fuzzy_threshold,
            confident_match_threshold: self.confident_match_threshold,
        })
    }
}

/// Instantiate the adapters named in `config`, in configured order.
///
/// Adapters without a credential are still registered; they stay disabled
/// and are skipped at lookup time.
fn providers_from_config(config: &ResolverConfig) -> Vec<Arc<dyn SymbolSearchProvider>> {
    config
        .providers
        .iter()
        .map(|kind| {
            let provider: Arc<dyn SymbolSearchProvider> = match kind {
                ProviderKind::Fmp => Arc::new(FmpProvider::new(
                    config.fmp_api_key.clone(),
                    config.http_timeout,
                )),
                ProviderKind::Finnhub => Arc::new(FinnhubProvider::new(
                    config.finnhub_api_key.clone(),
                    config.http_timeout,
                )),
                ProviderKind::AlphaVantage => Arc::new(AlphaVantageProvider::new(
                    config.alpha_vantage_api_key.clone(),
                    config.http_timeout,
                )),
            };

            if provider.is_enabled() {
                info!("Symbol search provider '{}' enabled", kind);
            } else {
                warn!(
                    "Symbol search provider '{}' is configured but has no API key. It will be skipped.",
                    kind
                );
            }
            provider
        })
        .collect()
}

impl TickerResolver {
    /// Start building a resolver.
    pub fn builder() -> TickerResolverBuilder {
        TickerResolverBuilder::default()
    }

    /// Build a resolver with the adapters, AI fallback and thresholds from
    /// `config` and the seeded catalog.
    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        let mut builder = Self::builder()
            .cache_ttl(config.cache_ttl)
            .fuzzy_threshold(config.fuzzy_threshold)
            .confident_match_threshold(config.confident_match_threshold);

        for provider in providers_from_config(config) {
            builder = builder.provider(provider);
        }

        let ai = OpenAiFallback::new(
            config.openai_api_key.clone(),
            config.openai_model.clone(),
            config.http_timeout,
        );
        if ai.is_enabled() {
            info!("AI fallback enabled with model '{}'", ai.model());
            builder = builder.ai_fallback(Arc::new(ai));
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_providers_follow_configured_order() {
        let config = ResolverConfig {
            providers: vec![ProviderKind::AlphaVantage, ProviderKind::Fmp],
            fmp_api_key: Some("key".to_string()),
            ..ResolverConfig::default()
        };

        let providers = providers_from_config(&config);
        let kinds: Vec<ProviderKind> = providers.iter().map(|p| p.kind()).collect();
        assert_eq!(kinds, vec![ProviderKind::AlphaVantage, ProviderKind::Fmp]);
        assert!(!providers[0].is_enabled());
        assert!(providers[1].is_enabled());
    }

    #[test]
    fn test_build_rejects_bad_thresholds() {
        let result = TickerResolver::builder()
            .catalog(SymbolCatalog::empty())
            .fuzzy_threshold(1.5)
            .build();
        assert!(matches!(result, Err(ResolverError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_default_config() {
        let resolver = TickerResolver::from_config(&ResolverConfig::default()).unwrap();
        assert!(!resolver.catalog().is_empty());
        assert_eq!(resolver.cache_stats().size, 0);
    }
}
