//! Last-resort ticker guesses from a chat-completion model.
//!
//! Only consulted after the catalog, the providers and fuzzy matching have
//! all come up empty. Like the providers, the fallback is fail-silent: any
//! error is logged and treated as "no guess".

pub mod openai;

use async_trait::async_trait;
use log::{debug, warn};

use crate::errors::ResolverError;

/// A ticker suggested by the model.
#[derive(Clone, Debug, PartialEq)]
pub struct AiGuess {
    pub ticker: String,
    pub company_name: String,
    /// Clamped to `[0, 1]`
    pub confidence: f64,
}

/// Confidence assumed when the model does not report one.
pub const DEFAULT_AI_CONFIDENCE: f64 = 0.85;

#[async_trait]
pub trait AiFallback: Send + Sync {
    /// Whether the fallback has the credential it needs.
    fn is_enabled(&self) -> bool;

    /// Ask the model for the ticker of `company_name`.
    ///
    /// `Ok(None)` means the model answered but did not know.
    async fn suggest(&self, company_name: &str) -> Result<Option<AiGuess>, ResolverError>;

    /// Fail-silent wrapper around [`suggest`](Self::suggest).
    async fn resolve(&self, company_name: &str) -> Option<AiGuess> {
        if !self.is_enabled() {
            debug!("AI fallback has no credential, skipping");
            return None;
        }

        match self.suggest(company_name).await {
            Ok(guess) => guess,
            Err(e) => {
                warn!("AI fallback failed for '{}': {}", company_name, e);
                None
            }
        }
    }
}
