//! Financial Modeling Prep symbol-search adapter.
//!
//! Uses the `/search` endpoint, which returns a bare JSON array of matches
//! with the short exchange code of each listing. Errors come back as an
//! object with an `Error Message` field, usually with a 200 status.
//!
//! API documentation: https://site.financialmodelingprep.com/developer/docs

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::ResolverError;
use crate::models::SymbolRecord;
use crate::provider::http::{build_client, fetch_text, parse_json};
use crate::provider::{candidate_from, ProviderKind, SymbolSearchProvider};

const BASE_URL: &str = "https://financialmodelingprep.com/api/v3";
const PROVIDER_ID: &str = "fmp";

/// Confidence assigned to Financial Modeling Prep search hits.
pub const DEFAULT_CONFIDENCE: f64 = 0.88;

/// Upper bound on matches requested per query.
const SEARCH_LIMIT: &str = "10";

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /search endpoint
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    Results(Vec<SearchItem>),
    Error {
        #[serde(rename = "Error Message")]
        error_message: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItem {
    symbol: String,
    name: Option<String>,
    /// Short exchange code (e.g., "NASDAQ", "NYSE")
    exchange_short_name: Option<String>,
    /// Long exchange name, used when the short code is missing
    stock_exchange: Option<String>,
}

// ============================================================================
// FmpProvider
// ============================================================================

/// Financial Modeling Prep symbol-search adapter.
pub struct FmpProvider {
    client: Client,
    api_key: Option<String>,
    confidence: f64,
}

impl FmpProvider {
    /// Create a new adapter. An absent or empty key disables it.
    pub fn new(api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            confidence: DEFAULT_CONFIDENCE,
        }
    }

    /// Override the confidence assigned to search hits.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    fn map_results(&self, response: SearchResponse) -> Result<Vec<SymbolRecord>, ResolverError> {
        match response {
            SearchResponse::Results(items) => Ok(items
                .iter()
                .filter_map(|item| {
                    let exchange = item
                        .exchange_short_name
                        .as_deref()
                        .or(item.stock_exchange.as_deref());
                    candidate_from(
                        &item.symbol,
                        item.name.as_deref(),
                        exchange,
                        self.default_confidence(),
                    )
                })
                .collect()),
            SearchResponse::Error { error_message } => Err(ResolverError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: error_message,
            }),
        }
    }
}

#[async_trait]
impl SymbolSearchProvider for FmpProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Fmp
    }

    fn default_confidence(&self) -> f64 {
        self.confidence
    }

    fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(&self, query: &str) -> Result<Vec<SymbolRecord>, ResolverError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| ResolverError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: "Missing API key".to_string(),
        })?;

        debug!("Searching Financial Modeling Prep for '{}'", query);

        let request = self
            .client
            .get(format!("{}/search", BASE_URL))
            .query(&[("query", query), ("limit", SEARCH_LIMIT), ("apikey", api_key)]);

        let body = fetch_text(PROVIDER_ID, request).await?;
        let response: SearchResponse = parse_json(PROVIDER_ID, &body)?;
        self.map_results(response)
    }
}

// ============================================================================
// Tests
// ============================================================================
