//! Telemetry records attached to every resolution.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::resolution::{ResolutionOutcome, ResolvedFrom};
use super::symbol::SymbolRecord;

/// Ambiguous outcomes list at most this many candidates in telemetry.
pub const MAX_TELEMETRY_CANDIDATES: usize = 3;

/// Kind of telemetry event, one per resolver exit path.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum TelemetryKind {
    #[serde(rename = "ticker_resolution_detected_ticker")]
    DetectedTicker,
    #[serde(rename = "ticker_resolution_cache_hit")]
    CacheHit,
    #[serde(rename = "symbol_resolved")]
    SymbolResolved,
    #[serde(rename = "symbol_ambiguous")]
    SymbolAmbiguous,
    #[serde(rename = "symbol_not_found")]
    SymbolNotFound,
}

impl TelemetryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DetectedTicker => "ticker_resolution_detected_ticker",
            Self::CacheHit => "ticker_resolution_cache_hit",
            Self::SymbolResolved => "symbol_resolved",
            Self::SymbolAmbiguous => "symbol_ambiguous",
            Self::SymbolNotFound => "symbol_not_found",
        }
    }
}

/// Short form of a candidate for telemetry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CandidateSummary {
    pub ticker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    pub confidence: f64,
}

impl From<&SymbolRecord> for CandidateSummary {
    fn from(record: &SymbolRecord) -> Self {
        Self {
            ticker: record.ticker.clone(),
            name: record.name.clone(),
            exchange: record.exchange.clone(),
            confidence: record.confidence,
        }
    }
}

/// Write-once record describing how a resolution call ended.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryEvent {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TelemetryKind,
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_from: Option<ResolvedFrom>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<CandidateSummary>>,
    pub timestamp: DateTime<Utc>,
}

impl TelemetryEvent {
    /// Build the event for `outcome`.
    pub fn new(
        kind: TelemetryKind,
        input: impl Into<String>,
        outcome: &ResolutionOutcome,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let (ticker, confidence, resolved_from, candidates) = match outcome {
            ResolutionOutcome::Resolved {
                symbol,
                resolved_from,
            } => (
                Some(symbol.ticker.clone()),
                Some(symbol.confidence),
                Some(*resolved_from),
                None,
            ),
            ResolutionOutcome::Ambiguous {
                candidates,
                resolved_from,
            } => (
                None,
                None,
                Some(*resolved_from),
                Some(
                    candidates
                        .iter()
                        .take(MAX_TELEMETRY_CANDIDATES)
                        .map(CandidateSummary::from)
                        .collect(),
                ),
            ),
            ResolutionOutcome::NotFound => (None, Some(0.0), Some(ResolvedFrom::NotFound), None),
        };

        Self {
            id: Uuid::now_v7(),
            kind,
            input: input.into(),
            ticker,
            confidence,
            resolved_from,
            candidates,
            timestamp,
        }
    }

    /// Write the event to the structured log.
    pub fn emit(&self) {
        let candidates = self
            .candidates
            .as_ref()
            .map(|list| {
                list.iter()
                    .map(|c| c.ticker.as_str())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .unwrap_or_default();

        tracing::info!(
            target: "tickerlens::telemetry",
            event_id = %self.id,
            event_type = self.kind.as_str(),
            input = %self.input,
            ticker = self.ticker.as_deref().unwrap_or(""),
            confidence = self.confidence.unwrap_or(f64::NAN),
            resolved_from = self.resolved_from.map(|r| r.as_str()).unwrap_or(""),
            candidates = %candidates,
            "ticker resolution finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderKind;

    #[test]
    fn test_ambiguous_event_caps_candidates() {
        let candidates = ["GOOGL", "GOOG", "GOOGX", "GOGL"]
            .iter()
            .map(|t| SymbolRecord::new(*t, None, 0.85))
            .collect();
        let outcome = ResolutionOutcome::Ambiguous {
            candidates,
            resolved_from: ResolvedFrom::Provider(ProviderKind::Fmp),
        };

        let event = TelemetryEvent::new(TelemetryKind::SymbolAmbiguous, "google", &outcome, Utc::now());
        let listed = event.candidates.unwrap();
        assert_eq!(listed.len(), MAX_TELEMETRY_CANDIDATES);
        assert_eq!(listed[0].ticker, "GOOGL");
        assert_eq!(event.ticker, None);
    }

    #[test]
    fn test_not_found_event() {
        let event = TelemetryEvent::new(
            TelemetryKind::SymbolNotFound,
            "zzz",
            &ResolutionOutcome::NotFound,
            Utc::now(),
        );
        assert_eq!(event.confidence, Some(0.0));
        assert_eq!(event.resolved_from, Some(ResolvedFrom::NotFound));

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "symbol_not_found");
        assert_eq!(json["resolvedFrom"], "not_found");
        assert!(json.get("ticker").is_none());
    }

    #[test]
    fn test_event_ids_are_unique() {
        let a = TelemetryEvent::new(TelemetryKind::SymbolNotFound, "a", &ResolutionOutcome::NotFound, Utc::now());
        let b = TelemetryEvent::new(TelemetryKind::SymbolNotFound, "a", &ResolutionOutcome::NotFound, Utc::now());
        assert_ne!(a.id, b.id);
    }
}
