//! Budget alert configuration.

use serde::{Deserialize, Serialize};

/// Minimum budget amount accepted when the alert is enabled.
pub const MIN_BUDGET_AMOUNT: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub enabled: bool,
    /// Budget ceiling in currency units; non-negative.
    pub amount: f64,
    /// Percentage of `amount` at which the "approaching budget" warning fires (10-100).
    pub warning_threshold: u8,
}

impl Default for BudgetAlert {
    fn default() -> Self {
        Self {
            enabled: false,
            amount: 0.0,
            warning_threshold: 80,
        }
    }
}

impl BudgetAlert {
    /// Absolute total at which the warning notification fires.
    pub fn warning_level(&self) -> f64 {
        self.amount * self.warning_threshold as f64 / 100.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BudgetValidationError {
    #[error("Budget amount must be at least 0.10 when the alert is enabled")]
    AmountTooLow,
    #[error("Budget amount cannot be negative")]
    NegativeAmount,
    #[error("Warning threshold must be between 10 and 100 percent")]
    ThresholdOutOfRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_level() {
        let budget = BudgetAlert {
            enabled: true,
            amount: 100.0,
            warning_threshold: 80,
        };
        assert_eq!(budget.warning_level(), 80.0);
    }

    #[test]
    fn test_default_is_disabled() {
        let budget = BudgetAlert::default();
        assert!(!budget.enabled);
        assert_eq!(budget.amount, 0.0);
        assert_eq!(budget.warning_threshold, 80);
    }
}
