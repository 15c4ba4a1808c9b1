//! Ticker records.

use serde::Serialize;

/// A ticker together with where it trades and how sure we are about it.
///
/// Catalog entries and lookup results share this shape. Records are never
/// edited in place; derive a new one with the `with_*` helpers instead.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SymbolRecord {
    /// Canonical uppercase ticker (e.g., "NVDA", "BRK.B")
    pub ticker: String,

    /// Exchange the ticker trades on, when known (e.g., "NASDAQ")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,

    /// Confidence in `[0, 1]`
    pub confidence: f64,

    /// Display name of the company, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SymbolRecord {
    /// Create a new record. The ticker is uppercased.
    pub fn new(ticker: impl Into<String>, exchange: Option<String>, confidence: f64) -> Self {
        Self {
            ticker: ticker.into().trim().to_uppercase(),
            exchange: exchange.filter(|e| !e.trim().is_empty()),
            confidence,
            name: None,
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = if name.trim().is_empty() { None } else { Some(name) };
        self
    }

    /// Same record with a different confidence.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Whether this record trades on `exchange` (ASCII case-insensitive).
    ///
    /// A record with an unknown exchange never matches a filter.
    pub fn trades_on(&self, exchange: &str) -> bool {
        self.exchange
            .as_deref()
            .is_some_and(|own| own.eq_ignore_ascii_case(exchange.trim()))
    }
}
