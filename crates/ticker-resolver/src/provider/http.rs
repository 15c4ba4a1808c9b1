//! HTTP plumbing shared by the provider adapters.

use std::time::Duration;

use log::debug;
use reqwest::{Client, RequestBuilder, StatusCode};

use crate::errors::ResolverError;

/// Build a client whose requests give up after `timeout`.
pub(crate) fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Send `request` and return the body of a successful response.
///
/// Timeouts and error statuses map to `ResolverError` variants tagged with
/// `provider`; other transport failures surface as `Network`.
pub(crate) async fn fetch_text(
    provider: &str,
    request: RequestBuilder,
) -> Result<String, ResolverError> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            ResolverError::Timeout {
                provider: provider.to_string(),
            }
        } else {
            ResolverError::from(e)
        }
    })?;

    let status = response.status();
    debug!("{} responded with HTTP {}", provider, status);

    // 403 is how several providers report an exhausted key quota
    if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::FORBIDDEN {
        return Err(ResolverError::RateLimited {
            provider: provider.to_string(),
        });
    }

    if status == StatusCode::UNAUTHORIZED {
        return Err(ResolverError::ProviderError {
            provider: provider.to_string(),
            message: "Invalid or missing API key".to_string(),
        });
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ResolverError::ProviderError {
            provider: provider.to_string(),
            message: format!("HTTP {} - {}", status, body),
        });
    }

    Ok(response.text().await?)
}

/// Parse `body` as `T`, reporting failures as a malformed response.
pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(
    provider: &str,
    body: &str,
) -> Result<T, ResolverError> {
    serde_json::from_str(body).map_err(|e| ResolverError::MalformedResponse {
        provider: provider.to_string(),
        message: e.to_string(),
    })
}
