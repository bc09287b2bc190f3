//! Initial data written into a fresh store.

use chrono::{DateTime, Utc};

use stallbook_accounting::{Expense, ExpenseCategory};
use stallbook_core::{ExpenseId, ItemId, SaleId, TransactionId};
use stallbook_inventory::{InventoryItem, InventoryTransaction, TransactionKind, Unit};
use stallbook_sales::{PaymentMethod, Sale, SaleVariation};

use super::r#trait::Snapshot;

fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_default()
}

pub fn sales() -> Vec<Sale> {
    vec![
        Sale {
            id: SaleId::new(),
            date: at("2023-10-26T10:00:00Z"),
            variation: SaleVariation::Large,
            quantity: 1,
            amount: 120_000,
            payment: PaymentMethod::Easypaisa,
            edit_history: Vec::new(),
        },
        Sale {
            id: SaleId::new(),
            date: at("2023-10-26T11:30:00Z"),
            variation: SaleVariation::Small,
            quantity: 2,
            amount: 160_000,
            payment: PaymentMethod::Cash,
            edit_history: Vec::new(),
        },
    ]
}

pub fn expenses() -> Vec<Expense> {
    vec![Expense {
        id: ExpenseId::new(),
        date: at("2023-10-25T09:00:00Z"),
        amount: 150_000,
        category: ExpenseCategory::Rent,
        description: "Monthly rent".to_string(),
    }]
}

pub fn inventory() -> Vec<InventoryItem> {
    vec![
        InventoryItem {
            id: ItemId::new(),
            name: "Chicken".to_string(),
            quantity: 20.0,
            unit: Unit::Kg,
            last_updated: at("2023-10-26T10:00:00Z"),
        },
        InventoryItem {
            id: ItemId::new(),
            name: "Pita Bread".to_string(),
            quantity: 100.0,
            unit: Unit::Pcs,
            last_updated: at("2023-10-26T10:00:00Z"),
        },
    ]
}

pub fn inventory_transactions() -> Vec<InventoryTransaction> {
    vec![InventoryTransaction {
        id: TransactionId::new(),
        date: at("2023-10-26T10:00:00Z"),
        kind: TransactionKind::Purchase,
        name: "Chicken".to_string(),
        quantity: 25.0,
        unit: Unit::Kg,
        cost: Some(2_000_000),
        edit_history: Vec::new(),
    }]
}

pub fn initial_snapshot() -> Snapshot {
    Snapshot {
        sales: sales(),
        expenses: expenses(),
        inventory: inventory(),
        inventory_transactions: inventory_transactions(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shop::ShopState;

    #[test]
    fn initial_data_passes_load_checks() {
        let state = ShopState::from_snapshot(initial_snapshot()).unwrap();
        assert_eq!(state.ledger().items().len(), 2);
        assert_eq!(state.sales().records().len(), 2);
        assert_eq!(state.expenses().records()[0].amount, 150_000);
    }
}
