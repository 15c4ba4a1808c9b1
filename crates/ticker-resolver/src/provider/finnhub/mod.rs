//! Finnhub symbol-search adapter.
//!
//! Uses the `/search` endpoint, authenticated with the `X-Finnhub-Token`
//! header. Finnhub does not report the listing exchange in search results, so
//! candidates carry an unknown exchange.
//!
//! API documentation: https://finnhub.io/docs/api/symbol-search

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::errors::ResolverError;
use crate::models::SymbolRecord;
use crate::provider::http::{build_client, fetch_text, parse_json};
use crate::provider::{candidate_from, ProviderKind, SymbolSearchProvider};

const BASE_URL: &str = "https://finnhub.io/api/v1";
const PROVIDER_ID: &str = "finnhub";

/// Confidence assigned to Finnhub search hits.
pub const DEFAULT_CONFIDENCE: f64 = 0.85;

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /search endpoint
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    // tried first: a results body never carries `error`
    Error {
        error: String,
    },
    Results {
        #[serde(default)]
        result: Vec<SearchItem>,
    },
}

/// Individual search result item
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItem {
    /// Full description/name
    #[serde(default)]
    description: String,
    /// Display symbol
    #[serde(default)]
    display_symbol: String,
    /// Symbol for API calls
    symbol: String,
    /// Security type (e.g., "Common Stock", "ETF")
    #[serde(rename = "type", default)]
    security_type: String,
}

// ============================================================================
// FinnhubProvider
// ============================================================================

/// Finnhub symbol-search adapter.
pub struct FinnhubProvider {
    client: Client,
    api_key: Option<String>,
    confidence: f64,
}

impl FinnhubProvider {
    /// Create a new Finnhub adapter. An absent or empty key disables it.
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
        let items = match response {
            SearchResponse::Results { result } => result,
            SearchResponse::Error { error } => {
                return Err(ResolverError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: error,
                })
            }
        };

        Ok(items
            .into_iter()
            .filter_map(|item| {
                let symbol = if item.symbol.is_empty() {
                    &item.display_symbol
                } else {
                    &item.symbol
                };
                debug!("Finnhub hit: {} ({})", symbol, item.security_type);
                candidate_from(symbol, Some(&item.description), None, self.default_confidence())
            })
            .collect())
    }
}

#[async_trait]
impl SymbolSearchProvider for FinnhubProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Finnhub
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

        debug!("Searching Finnhub for '{}'", query);

        let request = self
            .client
            .get(format!("{}/search", BASE_URL))
            .header("X-Finnhub-Token", api_key)
            .query(&[("q", query)]);

        let body = fetch_text(PROVIDER_ID, request).await?;
        let response: SearchResponse = parse_json(PROVIDER_ID, &body)?;
        self.map_results(response)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> FinnhubProvider {
        FinnhubProvider::new(Some("test_key".to_string()), Duration::from_secs(5))
    }

    #[test]
    fn test_provider_kind_and_confidence() {
        let provider = provider();
        assert_eq!(provider.kind(), ProviderKind::Finnhub);
        assert_eq!(provider.default_confidence(), 0.85);
        assert!(provider.is_enabled());
    }

    #[test]
    fn test_blank_key_disables_provider() {
        let provider = FinnhubProvider::new(Some("  ".to_string()), Duration::from_secs(5));
        assert!(!provider.is_enabled());
        assert!(!FinnhubProvider::new(None, Duration::from_secs(5)).is_enabled());
    }

    #[test]
    fn test_search_response_parsing() {
        let json = r#"{
            "count": 3,
            "result": [
                {
                    "description": "APPLE INC",
                    "displaySymbol": "AAPL",
                    "symbol": "AAPL",
                    "type": "Common Stock"
                },
                {
                    "description": "APPLE HOSPITALITY REIT INC",
                    "displaySymbol": "APLE",
                    "symbol": "APLE",
                    "type": "REIT"
                },
                {
                    "description": "APPLE INC",
                    "displaySymbol": "AAPL.SW",
                    "symbol": "AAPL.SW",
                    "type": "Common Stock"
                }
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let candidates = provider().map_results(response).unwrap();
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].ticker, "AAPL");
        assert_eq!(candidates[0].name.as_deref(), Some("APPLE INC"));
        assert_eq!(candidates[0].exchange, None);
        assert_eq!(candidates[0].confidence, DEFAULT_CONFIDENCE);
        assert_eq!(candidates[2].ticker, "AAPL.SW");
    }

    #[test]
    fn test_search_hits_use_configured_confidence() {
        let json = r#"{"count": 1, "result": [
            {"description": "APPLE INC", "displaySymbol": "AAPL", "symbol": "AAPL", "type": "Common Stock"}
        ]}"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let candidates = provider().with_confidence(0.6).map_results(response).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].confidence, 0.6);
    }

    #[test]
    fn test_search_drops_non_ticker_symbols() {
        let json = r#"{"count": 2, "result": [
            {"description": "TENCENT", "displaySymbol": "0700.HK", "symbol": "0700.HK", "type": "Common Stock"},
            {"description": "TENCENT ADR", "displaySymbol": "TCEHY", "symbol": "TCEHY", "type": "ADR"}
        ]}"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let candidates = provider().map_results(response).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].ticker, "TCEHY");
    }

    #[test]
    fn test_error_response_is_provider_error() {
        let json = r#"{"error": "Invalid API key"}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        match provider().map_results(response) {
            Err(ResolverError::ProviderError { message, .. }) => {
                assert_eq!(message, "Invalid API key")
            }
            other => panic!("Expected ProviderError, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_result() {
        let json = r#"{"count": 0, "result": []}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(provider().map_results(response).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_lookup_returns_none() {
        let provider = FinnhubProvider::new(None, Duration::from_secs(5));
        assert!(provider.lookup("apple").await.is_none());
    }
}
