//! Budget alert configuration, stored as a single document under `budget`.

use std::sync::Arc;

use anyhow::Result;

use super::connection::JsonConnection;
use crate::domain::models::BudgetAlert;
use crate::storage::traits::BudgetStorage;

const BUDGET_KEY: &str = "budget";

#[derive(Clone)]
pub struct BudgetRepository {
    connection: Arc<JsonConnection>,
}

impl BudgetRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }
}

impl BudgetStorage for BudgetRepository {
    fn load_budget(&self) -> Result<BudgetAlert> {
        self.connection.load(BUDGET_KEY)
    }

    fn save_budget(&self, budget: &BudgetAlert) -> Result<()> {
        self.connection.save(BUDGET_KEY, budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_budget_round_trip_and_default() {
        let temp_dir = TempDir::new().unwrap();
        let connection = Arc::new(JsonConnection::new(temp_dir.path()).unwrap());
        let repo = BudgetRepository::new(connection);

        assert_eq!(repo.load_budget().unwrap(), BudgetAlert::default());

        let budget = BudgetAlert {
            enabled: true,
            amount: 120.0,
            warning_threshold: 75,
        };
        repo.save_budget(&budget).unwrap();
        assert_eq!(repo.load_budget().unwrap(), budget);
    }
}
