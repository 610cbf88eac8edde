//! Forgotten-item patterns: fixed trigger/suggestion pairs with a per-pattern
//! throttle timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingPattern {
    /// Keywords matched (case-insensitive substring) against a newly added item name.
    pub trigger: Vec<String>,
    /// Item name suggested when a trigger keyword matches.
    pub suggestion: String,
    /// When this pattern last produced a suggestion; throttles repeats to once per hour.
    pub last_shown: Option<DateTime<Utc>>,
}

impl ShoppingPattern {
    pub fn new(trigger: &[&str], suggestion: &str) -> Self {
        Self {
            trigger: trigger.iter().map(|s| s.to_string()).collect(),
            suggestion: suggestion.to_string(),
            last_shown: None,
        }
    }
}

/// The built-in pattern table, seeded on first launch. Triggers carry both
/// English and Spanish keywords so the table works for either language.
pub fn default_patterns() -> Vec<ShoppingPattern> {
    vec![
        ShoppingPattern::new(
            &["pasta", "spaghetti", "espagueti", "macarrones"],
            "tomato sauce",
        ),
        ShoppingPattern::new(&["cereal", "cereales"], "milk"),
        ShoppingPattern::new(&["coffee", "café", "cafe"], "sugar"),
        ShoppingPattern::new(&["bread", "pan"], "butter"),
        ShoppingPattern::new(&["hamburger", "hamburguesa", "burger"], "hamburger buns"),
        ShoppingPattern::new(&["hot dog", "perrito"], "hot dog buns"),
        ShoppingPattern::new(&["nachos", "totopos"], "salsa"),
        ShoppingPattern::new(&["tea", "té"], "honey"),
        ShoppingPattern::new(&["pancake", "tortitas"], "maple syrup"),
        ShoppingPattern::new(&["salad", "ensalada", "lettuce", "lechuga"], "dressing"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns_have_no_last_shown() {
        let patterns = default_patterns();
        assert!(!patterns.is_empty());
        assert!(patterns.iter().all(|p| p.last_shown.is_none()));
        assert!(patterns.iter().all(|p| !p.trigger.is_empty()));
    }
}
