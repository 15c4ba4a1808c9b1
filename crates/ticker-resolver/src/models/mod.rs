//! Resolution data model
//!
//! This module contains the value types that flow through the resolver:
//! - `symbol` - Ticker records held by the catalog or returned by lookups (SymbolRecord)
//! - `resolution` - The resolver's output and provenance tags (ResolutionResult, ResolvedFrom)
//! - `telemetry` - The structured record attached to every result (TelemetryEvent)

mod resolution;
mod symbol;
mod telemetry;

pub use resolution::{ResolutionOutcome, ResolutionResult, ResolvedFrom};
pub use symbol::SymbolRecord;
pub use telemetry::{CandidateSummary, TelemetryEvent, TelemetryKind, MAX_TELEMETRY_CANDIDATES};
