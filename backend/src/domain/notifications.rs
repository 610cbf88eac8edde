//! Typed notifications raised by store mutations. The store never renders
//! anything; callers decide how (and whether) to surface these.

#[derive(Debug, Clone, PartialEq)]
pub enum StoreNotification {
    /// A new row was inserted.
    ItemAdded { name: String },
    /// An existing row absorbed the add; carries the new quantity.
    QuantityUpdated { name: String, quantity: u32 },
    /// The running total crossed `amount * warning_threshold / 100` with this add.
    BudgetWarning {
        total: f64,
        amount: f64,
        warning_threshold: u8,
    },
    /// The running total crossed the budget amount with this add. `audible`
    /// asks the caller to play an alert sound.
    BudgetExceeded {
        total: f64,
        amount: f64,
        audible: bool,
    },
    /// A pattern matched the added item and its companion is not on the list.
    ForgottenItem {
        trigger_item: String,
        suggestion: String,
    },
}
