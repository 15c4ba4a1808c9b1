//! Symbol-search provider trait definitions.
//!
//! This module defines the `SymbolSearchProvider` trait that all external
//! lookup adapters implement.

use async_trait::async_trait;
use log::{debug, warn};

use crate::errors::ResolverError;
use crate::models::SymbolRecord;

use super::kind::ProviderKind;

/// Trait for external symbol-search providers.
///
/// Implementors supply [`search`](Self::search), a fallible call to the
/// provider. The resolver only ever calls [`lookup`](Self::lookup), which
/// applies the fail-silent policy: a disabled adapter is never called and
/// every error becomes `None`.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use tickerlens_resolver::provider::{ProviderKind, SymbolSearchProvider};
///
/// struct MyProvider {
///     api_key: Option<String>,
/// }
///
/// #[async_trait]
/// impl SymbolSearchProvider for MyProvider {
///     fn kind(&self) -> ProviderKind {
///         ProviderKind::Finnhub
///     }
///
///     fn default_confidence(&self) -> f64 {
///         0.85
///     }
///
///     fn is_enabled(&self) -> bool {
///         self.api_key.is_some()
///     }
///
///     async fn search(&self, query: &str) -> Result<Vec<SymbolRecord>, ResolverError> {
///         // ... call the provider
///     }
/// }
/// ```
#[async_trait]
pub trait SymbolSearchProvider: Send + Sync {
    /// Which provider this adapter talks to. Also used as the provenance tag.
    fn kind(&self) -> ProviderKind;

    /// Confidence assigned to every candidate this provider returns.
    fn default_confidence(&self) -> f64;

    /// Whether the adapter has the credential it needs.
    fn is_enabled(&self) -> bool;

    /// Search the provider for `query`.
    ///
    /// # Arguments
    ///
    /// * `query` - The raw, non-normalized user query
    ///
    /// # Returns
    ///
    /// Candidates in provider order, or a `ResolverError` describing why the
    /// call failed.
    async fn search(&self, query: &str) -> Result<Vec<SymbolRecord>, ResolverError>;

    /// Fail-silent wrapper around [`search`](Self::search).
    ///
    /// Returns `None` without a network call when the adapter is disabled,
    /// and `None` when the call fails for any reason.
    async fn lookup(&self, query: &str) -> Option<Vec<SymbolRecord>> {
        if !self.is_enabled() {
            debug!("Provider '{}' has no credential, skipping", self.kind());
            return None;
        }

        match self.search(query).await {
            Ok(candidates) => {
                debug!(
                    "Provider '{}' returned {} candidates for '{}'",
                    self.kind(),
                    candidates.len(),
                    query
                );
                Some(candidates)
            }
            Err(e) => {
                warn!("Provider '{}' lookup failed for '{}': {}", self.kind(), query, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakyProvider {
        enabled: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SymbolSearchProvider for FlakyProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Finnhub
        }

        fn default_confidence(&self) -> f64 {
            0.85
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }

        async fn search(&self, _query: &str) -> Result<Vec<SymbolRecord>, ResolverError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ResolverError::Timeout {
                provider: "finnhub".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_lookup_absorbs_errors() {
        let provider = FlakyProvider {
            enabled: true,
            calls: AtomicUsize::new(0),
        };
        assert!(provider.lookup("apple").await.is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disabled_provider_is_never_called() {
        let provider = FlakyProvider {
            enabled: false,
            calls: AtomicUsize::new(0),
        };
        assert!(provider.lookup("apple").await.is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}
