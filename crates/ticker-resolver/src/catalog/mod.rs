//! Static name-to-ticker catalog.
//!
//! Seeded at construction from `seed_catalog.json`, embedded at compile time
//! via `include_str!`. Entries are keyed by normalized company name and kept
//! in insertion order so fuzzy matching breaks ties deterministically.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, info, warn};
use serde::Deserialize;

use crate::errors::{ResolverError, Result};
use crate::models::SymbolRecord;
use crate::normalize::{is_ticker_shaped, normalize};

const SEED_CATALOG: &str = include_str!("seed_catalog.json");

// ── JSON schema ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SeedCatalog {
    companies: Vec<SeedCompany>,
}

#[derive(Debug, Deserialize)]
struct SeedCompany {
    ticker: String,
    #[serde(default)]
    exchange: Option<String>,
    names: Vec<SeedName>,
}

#[derive(Debug, Deserialize)]
struct SeedName {
    name: String,
    confidence: f64,
}

// ── Store ────────────────────────────────────────────────────────────────────

/// Insertion-ordered map of normalized key to record.
#[derive(Default)]
struct Entries {
    order: Vec<String>,
    records: HashMap<String, SymbolRecord>,
}

impl Entries {
    fn upsert(&mut self, key: String, record: SymbolRecord) {
        if self.records.insert(key.clone(), record).is_none() {
            self.order.push(key);
        }
    }
}

/// Thread-safe catalog of well-known company names.
///
/// Reads vastly outnumber writes (`add_mapping`), hence the `RwLock`.
pub struct SymbolCatalog {
    entries: RwLock<Entries>,
}

impl SymbolCatalog {
    /// Create an empty catalog.
    pub fn empty() -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
        }
    }

    /// Create a catalog seeded from the embedded company list.
    ///
    /// # Errors
    ///
    /// `CatalogLoad` if the embedded JSON is malformed or any entry fails
    /// validation.
    pub fn seeded() -> Result<Self> {
        let catalog = Self::empty();
        catalog.load_seed(SEED_CATALOG)?;
        info!("Symbol catalog seeded with {} entries", catalog.len());
        Ok(catalog)
    }

    fn load_seed(&self, json: &str) -> Result<()> {
        let seed: SeedCatalog =
            serde_json::from_str(json).map_err(|e| ResolverError::CatalogLoad(e.to_string()))?;

        for company in seed.companies {
            for variant in &company.names {
                self.add(
                    &variant.name,
                    &company.ticker,
                    company.exchange.as_deref().unwrap_or_default(),
                    variant.confidence,
                )
                .map_err(|e| ResolverError::CatalogLoad(e.to_string()))?;
            }
        }

        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(|poisoned| {
            warn!("Symbol catalog lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(|poisoned| {
            warn!("Symbol catalog lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Exact lookup by normalized key.
    ///
    /// With `exchange_filter`, a record listed on a different (or unknown)
    /// exchange is treated as absent.
    pub fn lookup(&self, key: &str, exchange_filter: Option<&str>) -> Option<SymbolRecord> {
        let entries = self.read();
        let record = entries.records.get(key)?;

        match exchange_filter {
            Some(exchange) if !record.trades_on(exchange) => {
                debug!(
                    "Catalog hit for '{}' skipped: {} does not trade on {}",
                    key, record.ticker, exchange
                );
                None
            }
            _ => Some(record.clone()),
        }
    }

    /// Insert or overwrite the mapping for `raw_name`.
    ///
    /// The name is normalized before insertion. Overwriting keeps the
    /// original position; several names may map to the same ticker.
    ///
    /// # Errors
    ///
    /// `InvalidMapping` when the name normalizes to nothing, the ticker is not
    /// ticker-shaped, or the confidence is outside `[0, 1]`.
    pub fn add(&self, raw_name: &str, ticker: &str, exchange: &str, confidence: f64) -> Result<()> {
        let key = normalize(raw_name);
        if key.is_empty() {
            return Err(ResolverError::invalid_mapping(raw_name, "name is empty after normalization"));
        }
        if !is_ticker_shaped(ticker.trim()) {
            return Err(ResolverError::invalid_mapping(
                raw_name,
                format!("'{}' is not a valid ticker", ticker),
            ));
        }
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ResolverError::invalid_mapping(
                raw_name,
                format!("confidence {} is outside [0, 1]", confidence),
            ));
        }

        let record = SymbolRecord::new(ticker, Some(exchange.to_string()), confidence)
            .with_name(raw_name.trim());
        self.write().upsert(key, record);
        Ok(())
    }

    /// Snapshot of every `(key, record)` pair in insertion order.
    pub fn entries(&self) -> Vec<(String, SymbolRecord)> {
        let entries = self.read();
        entries
            .order
            .iter()
            .filter_map(|key| entries.records.get(key).map(|r| (key.clone(), r.clone())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SymbolCatalog {
    fn default() -> Self {
        Self::empty()
    }
}
