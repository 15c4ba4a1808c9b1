//! Resolver configuration assembled from environment variables.

use std::str::FromStr;
use std::time::Duration;

use crate::ai::openai::DEFAULT_MODEL;
use crate::cache::DEFAULT_CACHE_TTL_SECS;
use crate::errors::{ResolverError, Result};
use crate::fuzzy::{CONFIDENT_MATCH_THRESHOLD, DEFAULT_FUZZY_THRESHOLD};
use crate::provider::ProviderKind;

/// Default per-request timeout for provider and AI calls.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Everything needed to build a `TickerResolver`.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolverConfig {
    pub cache_ttl: Duration,
    pub fuzzy_threshold: f64,
    pub confident_match_threshold: f64,
    /// Adapters to try, in order.
    pub providers: Vec<ProviderKind>,
    pub http_timeout: Duration,
    pub fmp_api_key: Option<String>,
    pub finnhub_api_key: Option<String>,
    pub alpha_vantage_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS as u64),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            confident_match_threshold: CONFIDENT_MATCH_THRESHOLD,
            providers: ProviderKind::ALL.to_vec(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            fmp_api_key: None,
            finnhub_api_key: None,
            alpha_vantage_api_key: None,
            openai_api_key: None,
            openai_model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ResolverConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which returns the value of a
    /// variable if it is set.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let cache_ttl = match var("TICKERLENS_CACHE_TTL_SECS") {
            Some(v) => Duration::from_secs(parse_number("TICKERLENS_CACHE_TTL_SECS", &v)?),
            None => defaults.cache_ttl,
        };
        let http_timeout = match var("TICKERLENS_HTTP_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_number("TICKERLENS_HTTP_TIMEOUT_SECS", &v)?),
            None => defaults.http_timeout,
        };
        let fuzzy_threshold = match var("TICKERLENS_FUZZY_THRESHOLD") {
            Some(v) => parse_threshold("TICKERLENS_FUZZY_THRESHOLD", &v)?,
            None => defaults.fuzzy_threshold,
        };
        let confident_match_threshold = match var("TICKERLENS_CONFIDENT_MATCH") {
            Some(v) => parse_threshold("TICKERLENS_CONFIDENT_MATCH", &v)?,
            None => defaults.confident_match_threshold,
        };
        let providers = match var("TICKERLENS_PROVIDERS") {
            Some(v) => parse_providers(&v)?,
            None => defaults.providers,
        };

        Ok(Self {
            cache_ttl,
            fuzzy_threshold,
            confident_match_threshold,
            providers,
            http_timeout,
            fmp_api_key: var("FMP_API_KEY"),
            finnhub_api_key: var("FINNHUB_API_KEY"),
            alpha_vantage_api_key: var("ALPHA_VANTAGE_API_KEY"),
            openai_api_key: var("OPENAI_API_KEY"),
            openai_model: var("OPENAI_MODEL").unwrap_or(defaults.openai_model),
        })
    }
}

fn parse_number<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| ResolverError::invalid_config(format!("{} must be a whole number, got '{}'", name, value)))
}

fn parse_threshold(name: &str, value: &str) -> Result<f64> {
    let threshold: f64 = value
        .parse()
        .map_err(|_| ResolverError::invalid_config(format!("{} must be a number, got '{}'", name, value)))?;
    if !(0.0..=1.0).contains(&threshold) {
        return Err(ResolverError::invalid_config(format!(
            "{} must be between 0 and 1, got {}",
            name, threshold
        )));
    }
    Ok(threshold)
}

/// Comma-separated provider names. Duplicates keep their first position.
fn parse_providers(value: &str) -> Result<Vec<ProviderKind>> {
    let mut providers = Vec::new();
    for name in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let kind: ProviderKind = name.parse()?;
        if !providers.contains(&kind) {
            providers.push(kind);
        }
    }
    Ok(providers)
}
