//! Resolver output.

use std::fmt;

use serde::{Serialize, Serializer};

use super::symbol::SymbolRecord;
use super::telemetry::TelemetryEvent;
use crate::provider::ProviderKind;

/// Which strategy produced an answer.
///
/// A cache hit keeps the tag of the strategy that originally produced the
/// cached answer; the cache hit itself is recorded on the telemetry event.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ResolvedFrom {
    /// The input itself was ticker-shaped.
    InputDetection,
    /// Exact hit in the static catalog.
    LocalCache,
    /// An external symbol-search provider.
    Provider(ProviderKind),
    /// Approximate match against the catalog.
    FuzzyMatch,
    /// The AI completion fallback.
    OpenAi,
    /// Every strategy came up empty.
    NotFound,
}

impl ResolvedFrom {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InputDetection => "input_detection",
            Self::LocalCache => "local_cache",
            Self::Provider(kind) => kind.as_str(),
            Self::FuzzyMatch => "fuzzy_match",
            Self::OpenAi => "openai",
            Self::NotFound => "not_found",
        }
    }
}

impl fmt::Display for ResolvedFrom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ResolvedFrom {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The three shapes a resolution can take.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolutionOutcome {
    /// A single answer.
    Resolved {
        symbol: SymbolRecord,
        resolved_from: ResolvedFrom,
    },
    /// Several plausible answers, best first. Never cached.
    Ambiguous {
        candidates: Vec<SymbolRecord>,
        resolved_from: ResolvedFrom,
    },
    /// Nothing matched. Never cached.
    NotFound,
}

/// The resolver's answer for one query, with its telemetry record.
#[derive(Clone, Debug)]
pub struct ResolutionResult {
    /// The raw query as the caller passed it.
    pub input: String,
    pub outcome: ResolutionOutcome,
    pub telemetry: TelemetryEvent,
}

impl ResolutionResult {
    pub fn ticker(&self) -> Option<&str> {
        match &self.outcome {
            ResolutionOutcome::Resolved { symbol, .. } => Some(symbol.ticker.as_str()),
            _ => None,
        }
    }

    pub fn exchange(&self) -> Option<&str> {
        match &self.outcome {
            ResolutionOutcome::Resolved { symbol, .. } => symbol.exchange.as_deref(),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match &self.outcome {
            ResolutionOutcome::Resolved { symbol, .. } => symbol.name.as_deref(),
            _ => None,
        }
    }

    /// Confidence of the answer. `None` for ambiguous outcomes, `0.0` when
    /// nothing was found.
    pub fn confidence(&self) -> Option<f64> {
        match &self.outcome {
            ResolutionOutcome::Resolved { symbol, .. } => Some(symbol.confidence),
            ResolutionOutcome::Ambiguous { .. } => None,
            ResolutionOutcome::NotFound => Some(0.0),
        }
    }

    pub fn resolved_from(&self) -> ResolvedFrom {
        match &self.outcome {
            ResolutionOutcome::Resolved { resolved_from, .. }
            | ResolutionOutcome::Ambiguous { resolved_from, .. } => *resolved_from,
            ResolutionOutcome::NotFound => ResolvedFrom::NotFound,
        }
    }

    /// Candidates of an ambiguous outcome; empty otherwise.
    pub fn candidates(&self) -> &[SymbolRecord] {
        match &self.outcome {
            ResolutionOutcome::Ambiguous { candidates, .. } => candidates,
            _ => &[],
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.outcome, ResolutionOutcome::Resolved { .. })
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self.outcome, ResolutionOutcome::Ambiguous { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.outcome, ResolutionOutcome::NotFound)
    }

    /// Whether two results carry the same answer, ignoring input spelling
    /// and telemetry.
    pub fn same_answer(&self, other: &ResolutionResult) -> bool {
        self.outcome == other.outcome
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum ConfidenceView {
    Score(f64),
    Label(&'static str),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolutionView<'a> {
    input: &'a str,
    ticker: Option<&'a str>,
    name: Option<&'a str>,
    exchange: Option<&'a str>,
    confidence: ConfidenceView,
    resolved_from: ResolvedFrom,
    #[serde(skip_serializing_if = "no_candidates")]
    candidates: &'a [SymbolRecord],
    telemetry: &'a TelemetryEvent,
}

fn no_candidates(candidates: &&[SymbolRecord]) -> bool {
    candidates.is_empty()
}

impl Serialize for ResolutionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let confidence = match self.confidence() {
            Some(score) => ConfidenceView::Score(score),
            None => ConfidenceView::Label("ambiguous"),
        };

        ResolutionView {
            input: &self.input,
            ticker: self.ticker(),
            name: self.name(),
            exchange: self.exchange(),
            confidence,
            resolved_from: self.resolved_from(),
            candidates: self.candidates(),
            telemetry: &self.telemetry,
        }
        .serialize(serializer)
    }
}
