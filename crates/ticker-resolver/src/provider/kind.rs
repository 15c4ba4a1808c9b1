//! Tagged provider identifiers.

use std::fmt;
use std::str::FromStr;

use crate::errors::ResolverError;

/// The external symbol-search providers the resolver knows how to call.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ProviderKind {
    /// Financial Modeling Prep
    Fmp,
    /// Finnhub
    Finnhub,
    /// Alpha Vantage
    AlphaVantage,
}

impl ProviderKind {
    /// Default adapter order.
    pub const ALL: [ProviderKind; 3] = [Self::Fmp, Self::Finnhub, Self::AlphaVantage];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fmp => "fmp",
            Self::Finnhub => "finnhub",
            Self::AlphaVantage => "alpha_vantage",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ResolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "fmp" | "financial_modeling_prep" => Ok(Self::Fmp),
            "finnhub" => Ok(Self::Finnhub),
            "alpha_vantage" | "alphavantage" => Ok(Self::AlphaVantage),
            other => Err(ResolverError::invalid_config(format!(
                "Unknown provider: {}",
                other
            ))),
        }
    }
}

/// Which adapters a resolution call may use.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ProviderSelection {
    /// Every configured adapter, in configured order.
    #[default]
    Auto,
    /// Only the named adapter.
    Only(ProviderKind),
}

impl ProviderSelection {
    pub fn allows(&self, kind: ProviderKind) -> bool {
        match self {
            Self::Auto => true,
            Self::Only(only) => *only == kind,
        }
    }
}

impl FromStr for ProviderSelection {
    type Err = ResolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(Self::Auto)
        } else {
            s.parse().map(Self::Only)
        }
    }
}
