//! LLM suggestion/categorization client.
//!
//! The remote endpoint takes a free-text prompt plus a target language and
//! answers with JSON carrying either a `categories` map or an
//! `ingredients`/`items` list. Responses are advisory: anything malformed or
//! non-JSON degrades to `None` rather than an error.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default suggestion endpoint.
pub const DEFAULT_LLM_URL: &str = "http://localhost:11434/api/generate";

/// Timeout for suggestion requests (seconds).
pub const LLM_TIMEOUT_SECS: u64 = 30;

/// A single item proposed by the suggestion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedItem {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub price: Option<f64>,
}

/// The two response shapes the endpoint is known to produce.
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionResponse {
    /// Category name -> item names, from a categorization prompt.
    Categories(BTreeMap<String, Vec<String>>),
    /// Flat ingredient/item list, from a recipe prompt.
    Items(Vec<SuggestedItem>),
}

/// Abstraction over the suggestion endpoint so callers can be tested without
/// a network.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    async fn suggest(&self, prompt: &str, language: &str) -> Result<Option<SuggestionResponse>>;
}

#[derive(Debug, Serialize)]
struct SuggestionRequest<'a> {
    prompt: &'a str,
    language: &'a str,
}

pub struct LlmClient {
    client: Client,
    base_url: String,
}

impl LlmClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(LLM_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, base_url })
    }

    /// Create from the `SHOPPING_LLM_URL` environment variable, falling back
    /// to the default endpoint.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("SHOPPING_LLM_URL").unwrap_or_else(|_| DEFAULT_LLM_URL.to_string());
        Self::new(base_url)
    }
}

#[async_trait]
impl SuggestionProvider for LlmClient {
    async fn suggest(&self, prompt: &str, language: &str) -> Result<Option<SuggestionResponse>> {
        debug!("Requesting suggestions from {}", self.base_url);
        let response = self
            .client
            .post(&self.base_url)
            .json(&SuggestionRequest { prompt, language })
            .send()
            .await
            .context("Suggestion request failed")?;

        if !response.status().is_success() {
            warn!("Suggestion endpoint returned {}", response.status());
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .context("Failed to read suggestion response body")?;
        Ok(parse_suggestion_response(&body))
    }
}

/// Lenient parse of the endpoint's JSON. Probes `categories` first, then
/// `ingredients`, then `items`; unknown shapes and non-JSON yield `None`.
pub fn parse_suggestion_response(body: &str) -> Option<SuggestionResponse> {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            warn!("Suggestion response is not JSON: {}", e);
            return None;
        }
    };

    if let Some(categories) = value.get("categories").and_then(Value::as_object) {
        let mut map = BTreeMap::new();
        for (category, names) in categories {
            let names: Vec<String> = names
                .as_array()
                .map(|list| {
                    list.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            if !names.is_empty() {
                map.insert(category.clone(), names);
            }
        }
        if !map.is_empty() {
            return Some(SuggestionResponse::Categories(map));
        }
    }

    let list = value
        .get("ingredients")
        .or_else(|| value.get("items"))
        .and_then(Value::as_array)?;
    let items: Vec<SuggestedItem> = list.iter().filter_map(parse_suggested_item).collect();
    if items.is_empty() {
        None
    } else {
        Some(SuggestionResponse::Items(items))
    }
}

fn parse_suggested_item(value: &Value) -> Option<SuggestedItem> {
    if let Some(name) = value.as_str() {
        return Some(SuggestedItem {
            name: name.to_string(),
            quantity: None,
            price: None,
        });
    }
    let name = value.get("name")?.as_str()?.to_string();
    Some(SuggestedItem {
        name,
        quantity: value
            .get("quantity")
            .and_then(Value::as_u64)
            .map(|q| q as u32),
        price: value.get("price").and_then(Value::as_f64),
    })
}

/// Canned provider for tests.
#[cfg(test)]
pub struct MockSuggestionProvider {
    pub response: Option<SuggestionResponse>,
}

#[cfg(test)]
#[async_trait]
impl SuggestionProvider for MockSuggestionProvider {
    async fn suggest(&self, _prompt: &str, _language: &str) -> Result<Option<SuggestionResponse>> {
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_categories_response() {
        let body = r#"{"categories": {"dairy": ["milk", "cheese"], "bakery": ["bread"]}}"#;
        let parsed = parse_suggestion_response(body).unwrap();
        match parsed {
            SuggestionResponse::Categories(map) => {
                assert_eq!(map["dairy"], vec!["milk", "cheese"]);
                assert_eq!(map["bakery"], vec!["bread"]);
            }
            other => panic!("expected categories, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_ingredient_objects() {
        let body = r#"{"ingredients": [{"name": "tomato", "quantity": 3, "price": 0.5}, {"name": "basil"}]}"#;
        let parsed = parse_suggestion_response(body).unwrap();
        match parsed {
            SuggestionResponse::Items(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].name, "tomato");
                assert_eq!(items[0].quantity, Some(3));
                assert_eq!(items[0].price, Some(0.5));
                assert_eq!(items[1].quantity, None);
            }
            other => panic!("expected items, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_plain_string_items() {
        let body = r#"{"items": ["milk", "eggs"]}"#;
        let parsed = parse_suggestion_response(body).unwrap();
        match parsed {
            SuggestionResponse::Items(items) => {
                assert_eq!(items[0].name, "milk");
                assert_eq!(items[1].name, "eggs");
            }
            other => panic!("expected items, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_responses_degrade_to_none() {
        assert!(parse_suggestion_response("not json at all").is_none());
        assert!(parse_suggestion_response("{}").is_none());
        assert!(parse_suggestion_response(r#"{"categories": {}}"#).is_none());
        assert!(parse_suggestion_response(r#"{"ingredients": []}"#).is_none());
        assert!(parse_suggestion_response(r#"{"ingredients": [{"price": 1.0}]}"#).is_none());
    }

    #[tokio::test]
    async fn test_mock_provider_round_trip() {
        let provider = MockSuggestionProvider {
            response: Some(SuggestionResponse::Items(vec![SuggestedItem {
                name: "milk".to_string(),
                quantity: Some(1),
                price: None,
            }])),
        };
        let result = provider.suggest("breakfast", "en").await.unwrap();
        assert!(matches!(result, Some(SuggestionResponse::Items(items)) if items.len() == 1));
    }
}
