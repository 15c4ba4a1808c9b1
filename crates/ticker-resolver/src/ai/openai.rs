//! OpenAI chat-completions fallback.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{AiFallback, AiGuess, DEFAULT_AI_CONFIDENCE};
use crate::errors::ResolverError;
use crate::normalize::is_ticker_shaped;
use crate::provider::http::{build_client, fetch_text, parse_json};

const API_URL: &str = "https://api.openai.com/v1/chat/completions";
const PROVIDER_ID: &str = "openai";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str = "You map company names to their primary US stock ticker. \
Respond with JSON only, no prose: {\"ticker\": \"SYMBOL\", \"companyName\": \"Official Name\", \"confidence\": 0.0-1.0}. \
If the company is not publicly traded or you are unsure, respond with {\"ticker\": null}.";

/// OpenAI client for ticker guesses.
pub struct OpenAiFallback {
    client: Client,
    api_key: Option<String>,
    model: String,
}

impl OpenAiFallback {
    /// Create a new client. An absent or empty key disables it.
    pub fn new(api_key: Option<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, company_name: &str) -> Request {
        Request {
            model: self.model.clone(),
            temperature: 0.0,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user",
                    content: format!("What is the stock ticker for \"{}\"?", company_name),
                },
            ],
        }
    }
}

#[derive(Serialize)]
struct Request {
    model: String,
    temperature: f64,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct Response {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// What the model is asked to answer with.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Suggestion {
    #[serde(default)]
    ticker: Option<String>,
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Drop a surrounding markdown code fence, if any.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.split_once('\n') {
        // skip the info string ("json") on the opening line
        Some((_, body)) => body,
        // single-line fence: anything before the object is the info string
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    body.trim_end().trim_end_matches("```").trim()
}

/// Interpret the assistant message.
///
/// `Ok(None)` when the model declined (null or unusable ticker), `Err` when
/// the content is not the JSON object we asked for.
fn parse_suggestion(content: &str, company_name: &str) -> Result<Option<AiGuess>, ResolverError> {
    let suggestion: Suggestion = parse_json(PROVIDER_ID, strip_code_fence(content))?;

    let Some(ticker) = suggestion.ticker.map(|t| t.trim().to_uppercase()) else {
        return Ok(None);
    };
    if !is_ticker_shaped(&ticker) {
        debug!("Discarding AI ticker '{}' for '{}'", ticker, company_name);
        return Ok(None);
    }

    let confidence = suggestion
        .confidence
        .filter(|c| c.is_finite())
        .unwrap_or(DEFAULT_AI_CONFIDENCE)
        .clamp(0.0, 1.0);

    Ok(Some(AiGuess {
        ticker,
        company_name: suggestion
            .company_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| company_name.to_string()),
        confidence,
    }))
}

#[async_trait]
impl AiFallback for OpenAiFallback {
    fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn suggest(&self, company_name: &str) -> Result<Option<AiGuess>, ResolverError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| ResolverError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: "Missing API key".to_string(),
        })?;

        debug!("Asking {} for the ticker of '{}'", self.model, company_name);

        let request = self
            .client
            .post(API_URL)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&self.build_request(company_name));

        let body = fetch_text(PROVIDER_ID, request).await?;
        let response: Response = parse_json(PROVIDER_ID, &body)?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ResolverError::MalformedResponse {
                provider: PROVIDER_ID.to_string(),
                message: "No message content in completion".to_string(),
            })?;

        parse_suggestion(&content, company_name)
    }
}
