//! Per-call resolution options.

use crate::provider::ProviderSelection;

/// Options for a single [`resolve`](super::TickerResolver::resolve) call.
///
/// None of these affect the cache key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolveOptions {
    /// Prefer listings on this exchange (e.g., "NASDAQ").
    pub exchange: Option<String>,
    /// Which external providers may be called.
    pub provider: ProviderSelection,
    /// Skip the cache read. Successful results are still written back.
    pub force_refresh: bool,
}

impl ResolveOptions {
    pub fn with_exchange(mut self, exchange: impl Into<String>) -> Self {
        let exchange = exchange.into();
        self.exchange = if exchange.trim().is_empty() {
            None
        } else {
            Some(exchange.trim().to_string())
        };
        self
    }

    pub fn with_provider(mut self, provider: ProviderSelection) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_force_refresh(mut self, force_refresh: bool) -> Self {
        self.force_refresh = force_refresh;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderKind;

    #[test]
    fn test_builder_helpers() {
        let options = ResolveOptions::default()
            .with_exchange(" NASDAQ ")
            .with_provider(ProviderSelection::Only(ProviderKind::Fmp))
            .with_force_refresh(true);

        assert_eq!(options.exchange.as_deref(), Some("NASDAQ"));
        assert_eq!(options.provider, ProviderSelection::Only(ProviderKind::Fmp));
        assert!(options.force_refresh);

        assert_eq!(ResolveOptions::default().with_exchange("  ").exchange, None);
    }
}
