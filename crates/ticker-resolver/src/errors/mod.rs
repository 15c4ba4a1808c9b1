//! Error types for the ticker resolution crate.
//!
//! Resolution outcomes (not found, ambiguous) are values, never errors.
//! [`ResolverError`] covers two families:
//!
//! - Configuration errors (`InvalidConfig`, `InvalidMapping`, `CatalogLoad`),
//!   which surface to callers at construction time or from `add_mapping`.
//! - Provider errors (`ProviderError`, `RateLimited`, `Timeout`,
//!   `MalformedResponse`, `Network`), which adapters produce internally and
//!   absorb at their boundary.

use thiserror::Error;

/// Errors that can occur while configuring or running the resolver.
#[derive(Error, Debug)]
pub enum ResolverError {
    /// A configuration value could not be parsed or is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A catalog mapping was rejected.
    #[error("Invalid mapping for '{name}': {reason}")]
    InvalidMapping {
        /// The raw company name of the rejected mapping
        name: String,
        /// Why the mapping was rejected
        reason: String,
    },

    /// The embedded seed catalog could not be loaded.
    #[error("Failed to load seed catalog: {0}")]
    CatalogLoad(String),

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider rate limited the request.
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider answered with a body we could not interpret.
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse {
        /// The provider that sent the body
        provider: String,
        /// What went wrong while parsing
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ResolverError {
    /// Create a new invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new invalid mapping error.
    pub fn invalid_mapping(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMapping {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ResolverError>;
