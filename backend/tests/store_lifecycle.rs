//! End-to-end lifecycle over a real data directory: two sessions against the
//! same files, exercising persistence of items, budget, history, patterns and
//! purchase stats.

use std::sync::Arc;

use chrono::Duration;
use tempfile::TempDir;

use shopping_list_backend::domain::clock::FixedClock;
use shopping_list_backend::domain::notifications::StoreNotification;
use shopping_list_backend::{
    AddItemCommand, JsonConnection, ShoppingListStore, UpdateBudgetCommand,
};

#[test]
fn full_session_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let connection = Arc::new(JsonConnection::new(temp_dir.path()).unwrap());
    let clock = Arc::new(FixedClock::new("2025-06-01T09:00:00Z".parse().unwrap()));

    // Session one: configure a budget, build a list, buy one thing.
    let leche_id = {
        let mut store = ShoppingListStore::new(connection.clone(), clock.clone()).unwrap();
        store
            .update_budget(UpdateBudgetCommand {
                enabled: Some(true),
                amount: Some(20.0),
                warning_threshold: Some(80),
            })
            .unwrap();

        let leche = store
            .add_item(AddItemCommand::new("Leche", 1.50).with_quantity(2))
            .unwrap();
        store
            .add_item(AddItemCommand::new("Pasta", 1.20).with_category("despensa"))
            .unwrap();
        store.toggle_item_completion(&leche.item_id);
        leche.item_id
    };

    // Session two, same morning: everything is back, phantoms not duplicated.
    {
        let store = ShoppingListStore::new(connection.clone(), clock.clone()).unwrap();
        assert_eq!(store.get_phantom_items().len(), 5);
        assert_eq!(store.get_regular_items().len(), 2);
        assert!(store.budget().enabled);
        assert_eq!(store.budget().amount, 20.0);

        let leche = store
            .items()
            .iter()
            .find(|i| i.id == leche_id)
            .expect("leche persisted");
        assert!(leche.completed);
        assert_eq!(store.purchase_stats()["leche"].frequency, 1);

        // Completed rows stay out of the running total.
        assert!((store.calculate_total(None) - 1.20).abs() < 1e-9);
    }

    // Next morning: the stale list rolls into history automatically.
    clock.advance(Duration::days(1));
    let mut store = ShoppingListStore::new(connection, clock).unwrap();
    assert!(store.get_regular_items().is_empty());
    assert_eq!(store.history().len(), 1);
    assert_eq!(store.history()[0].items.len(), 2);

    // Yesterday's list can be brought back as a fresh, unbought list.
    let entry_id = store.history()[0].id.clone();
    assert!(store.restore_list_from_history(&entry_id));
    assert_eq!(store.get_regular_items().len(), 2);
    assert!(store.get_regular_items().iter().all(|i| !i.completed));

    // The pattern fired yesterday; a day later it is out of its throttle
    // window and fires again.
    let result = store.add_item(AddItemCommand::new("pasta", 0.90)).unwrap();
    assert!(result
        .notifications
        .iter()
        .any(|n| matches!(n, StoreNotification::ForgottenItem { .. })));
}
