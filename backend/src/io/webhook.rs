//! Webhook relay client.
//!
//! Analytics-style events go out as fire-and-forget POSTs. The relay may
//! answer with a free-text `output` field; when it does, the text is parsed
//! heuristically into a description line plus dash-prefixed ingredient lines.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

/// Timeout for webhook requests (seconds).
pub const WEBHOOK_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Serialize)]
struct WebhookEvent<'a> {
    action: &'a str,
    prompt: &'a str,
    timestamp: DateTime<Utc>,
    language: &'a str,
}

/// Recipe-shaped text extracted from a webhook response.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeOutput {
    pub description: String,
    pub ingredients: Vec<String>,
}

pub struct WebhookClient {
    client: Client,
    url: String,
}

impl WebhookClient {
    pub fn new(url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, url })
    }

    /// Create from the `SHOPPING_WEBHOOK_URL` environment variable; `None`
    /// when the relay is not configured.
    pub fn from_env() -> Result<Option<Self>> {
        match std::env::var("SHOPPING_WEBHOOK_URL") {
            Ok(url) if !url.trim().is_empty() => Self::new(url).map(Some),
            _ => Ok(None),
        }
    }

    /// Post an event and, if the relay answered with an `output` payload,
    /// parse it. Transport failures are logged and swallowed: the relay is
    /// never required for correctness.
    pub async fn send_event(
        &self,
        action: &str,
        prompt: &str,
        language: &str,
    ) -> Option<RecipeOutput> {
        let event = WebhookEvent {
            action,
            prompt,
            timestamp: Utc::now(),
            language,
        };
        debug!("Posting webhook event '{}' to {}", action, self.url);
        let response = match self.client.post(&self.url).json(&event).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Webhook event '{}' failed: {}", action, e);
                return None;
            }
        };
        if !response.status().is_success() {
            warn!("Webhook returned {} for '{}'", response.status(), action);
            return None;
        }
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read webhook response: {}", e);
                return None;
            }
        };
        parse_webhook_output(&body)
    }
}

/// Extract recipe text from a webhook response body. The body is either a
/// JSON object with an `output` string or raw text; the first non-dash line
/// becomes the description and every `-`-prefixed line an ingredient.
pub fn parse_webhook_output(body: &str) -> Option<RecipeOutput> {
    let text = match serde_json::from_str::<Value>(body) {
        Ok(value) => value.get("output")?.as_str()?.to_string(),
        Err(_) => body.to_string(),
    };

    let mut description = String::new();
    let mut ingredients = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(ingredient) = line.strip_prefix('-') {
            let ingredient = ingredient.trim();
            if !ingredient.is_empty() {
                ingredients.push(ingredient.to_string());
            }
        } else if description.is_empty() {
            description = line.to_string();
        }
    }

    if description.is_empty() && ingredients.is_empty() {
        None
    } else {
        Some(RecipeOutput {
            description,
            ingredients,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_output_field() {
        let body = r#"{"output": "Tortilla de patatas\n- 4 eggs\n- 2 potatoes\n- olive oil"}"#;
        let parsed = parse_webhook_output(body).unwrap();
        assert_eq!(parsed.description, "Tortilla de patatas");
        assert_eq!(parsed.ingredients, vec!["4 eggs", "2 potatoes", "olive oil"]);
    }

    #[test]
    fn test_parse_raw_text_body() {
        let body = "Simple salad\n- lettuce\n- tomato";
        let parsed = parse_webhook_output(body).unwrap();
        assert_eq!(parsed.description, "Simple salad");
        assert_eq!(parsed.ingredients.len(), 2);
    }

    #[test]
    fn test_parse_ignores_extra_prose_lines() {
        let body = "Recipe one\nSome extra commentary\n- flour";
        let parsed = parse_webhook_output(body).unwrap();
        assert_eq!(parsed.description, "Recipe one");
        assert_eq!(parsed.ingredients, vec!["flour"]);
    }

    #[test]
    fn test_parse_empty_and_missing_output() {
        assert!(parse_webhook_output("").is_none());
        assert!(parse_webhook_output(r#"{"status": "ok"}"#).is_none());
        assert!(parse_webhook_output(r#"{"output": "   "}"#).is_none());
    }
}
