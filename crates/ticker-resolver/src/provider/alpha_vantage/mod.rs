//! Alpha Vantage symbol-search adapter.
//!
//! Uses the `SYMBOL_SEARCH` function. Alpha Vantage reports region rather
//! than exchange, so candidates carry an unknown exchange.
//!
//! Note: Alpha Vantage answers rate limiting and key problems with a 200
//! status and a `Note`, `Information` or `Error Message` field in the body.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;

use crate::errors::ResolverError;
use crate::models::SymbolRecord;
use crate::provider::http::{build_client, fetch_text, parse_json};
use crate::provider::{candidate_from, ProviderKind, SymbolSearchProvider};

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER_ID: &str = "alpha_vantage";

/// Confidence assigned to Alpha Vantage search hits.
pub const DEFAULT_CONFIDENCE: f64 = 0.85;

// ============================================================================
// Response structures for Alpha Vantage API
// ============================================================================

/// SYMBOL_SEARCH response
#[derive(Debug, Deserialize)]
struct SymbolSearchResponse {
    #[serde(rename = "bestMatches")]
    best_matches: Option<Vec<SymbolMatch>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SymbolMatch {
    #[serde(rename = "1. symbol")]
    symbol: String,
    #[serde(rename = "2. name")]
    name: Option<String>,
    #[serde(rename = "4. region")]
    region: Option<String>,
}

// ============================================================================
// AlphaVantageProvider implementation
// ============================================================================

/// Alpha Vantage symbol-search adapter.
///
/// Free tier is limited to a handful of calls per minute, so this adapter is
/// last in the default order.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: Option<String>,
    confidence: f64,
}

impl AlphaVantageProvider {
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

    /// Check for API-level errors in the response.
    fn check_api_error(response: &SymbolSearchResponse) -> Result<(), ResolverError> {
        if let Some(ref msg) = response.error_message {
            return Err(ResolverError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: msg.clone(),
            });
        }

        for msg in [&response.note, &response.information].into_iter().flatten() {
            if msg.contains("API call frequency") || msg.contains("rate limit") {
                return Err(ResolverError::RateLimited {
                    provider: PROVIDER_ID.to_string(),
                });
            }
            warn!("Alpha Vantage note: {}", msg);
        }

        Ok(())
    }

    fn map_results(&self, response: SymbolSearchResponse) -> Result<Vec<SymbolRecord>, ResolverError> {
        Self::check_api_error(&response)?;

        Ok(response
            .best_matches
            .unwrap_or_default()
            .iter()
            .filter_map(|m| {
                debug!(
                    "Alpha Vantage hit: {} ({})",
                    m.symbol,
                    m.region.as_deref().unwrap_or("unknown region")
                );
                candidate_from(&m.symbol, m.name.as_deref(), None, self.default_confidence())
            })
            .collect())
    }
}

#[async_trait]
impl SymbolSearchProvider for AlphaVantageProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::AlphaVantage
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

        debug!("Searching Alpha Vantage for '{}'", query);

        let request = self.client.get(BASE_URL).query(&[
            ("function", "SYMBOL_SEARCH"),
            ("keywords", query),
            ("apikey", api_key),
        ]);

        let body = fetch_text(PROVIDER_ID, request).await?;
        let response: SymbolSearchResponse = parse_json(PROVIDER_ID, &body)?;
        self.map_results(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> AlphaVantageProvider {
        AlphaVantageProvider::new(Some("test_key".to_string()), Duration::from_secs(5))
    }

    #[test]
    fn test_provider_kind_and_confidence() {
        let provider = provider();
        assert_eq!(provider.kind(), ProviderKind::AlphaVantage);
        assert_eq!(provider.default_confidence(), 0.85);
        assert!(provider.is_enabled());
        assert!(!AlphaVantageProvider::new(None, Duration::from_secs(5)).is_enabled());
    }

    #[test]
    fn test_symbol_search_parsing() {
        let json = r#"{
            "bestMatches": [
                {
                    "1. symbol": "TSCO.LON",
                    "2. name": "Tesco PLC",
                    "3. type": "Equity",
                    "4. region": "United Kingdom",
                    "8. currency": "GBX",
                    "9. matchScore": "0.7273"
                },
                {
                    "1. symbol": "TSCDF",
                    "2. name": "Tesco plc",
                    "3. type": "Equity",
                    "4. region": "United States",
                    "8. currency": "USD",
                    "9. matchScore": "0.7143"
                }
            ]
        }"#;

        let response: SymbolSearchResponse = serde_json::from_str(json).unwrap();
        let candidates = provider().map_results(response).unwrap();
        // TSCO.LON carries a three-letter venue suffix and is dropped
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].ticker, "TSCDF");
        assert_eq!(candidates[0].name.as_deref(), Some("Tesco plc"));
        assert_eq!(candidates[0].exchange, None);
    }

    #[test]
    fn test_rate_limit_note() {
        let json = r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#;
        let response: SymbolSearchResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            provider().map_results(response),
            Err(ResolverError::RateLimited { .. })
        ));
    }

    #[test]
    fn test_information_rate_limit() {
        let json = r#"{"Information": "We have detected your API key and our standard API rate limit is 25 requests per day."}"#;
        let response: SymbolSearchResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            provider().map_results(response),
            Err(ResolverError::RateLimited { .. })
        ));
    }

    #[test]
    fn test_error_message() {
        let json = r#"{"Error Message": "Invalid API call."}"#;
        let response: SymbolSearchResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            provider().map_results(response),
            Err(ResolverError::ProviderError { .. })
        ));
    }

    #[test]
    fn test_missing_matches_is_empty() {
        let response: SymbolSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(provider().map_results(response).unwrap().is_empty());
    }
}
