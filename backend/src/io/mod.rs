//! External HTTP boundaries. Everything here is advisory: failures degrade to
//! "no suggestion" and never block a store operation.

pub mod llm;
pub mod webhook;

pub use llm::{LlmClient, SuggestedItem, SuggestionProvider, SuggestionResponse};
pub use webhook::{RecipeOutput, WebhookClient};
