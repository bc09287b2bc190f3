//! Read-side queries over current stock.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use stallbook_core::ItemId;

use crate::item::{InventoryItem, ItemKey};
use crate::transaction::InventoryTransaction;
use crate::unit::Unit;

/// Multiple of the low-stock threshold under which an item is worth watching.
pub const WATCH_FACTOR: f64 = 2.5;

/// Inventory state used by business logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    InStock,
}

/// Display tier. `Watch` is a visual hint only, not a business state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockTier {
    Low,
    Watch,
    Healthy,
}

pub fn status_of(quantity: f64, unit: Unit) -> StockStatus {
    if quantity <= 0.0 {
        StockStatus::OutOfStock
    } else if quantity < unit.low_stock_threshold() {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

pub fn tier_of(quantity: f64, unit: Unit) -> StockTier {
    let threshold = unit.low_stock_threshold();
    if quantity < threshold {
        StockTier::Low
    } else if quantity < threshold * WATCH_FACTOR {
        StockTier::Watch
    } else {
        StockTier::Healthy
    }
}

/// Recorded quantity vs. the net of every transaction for the same key.
///
/// The two drift apart when a transaction is edited after the fact, or when
/// an item was seeded without transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationLine {
    pub item_id: ItemId,
    pub name: String,
    pub unit: Unit,
    pub recorded: f64,
    pub transaction_net: f64,
    pub drift: f64,
}

impl ReconciliationLine {
    pub fn is_consistent(&self) -> bool {
        self.drift.abs() < 1e-9
    }
}

/// Query-only view over the item collection.
#[derive(Debug, Clone, Copy)]
pub struct StockAggregator<'a> {
    items: &'a [InventoryItem],
    transactions: &'a [InventoryTransaction],
}

impl<'a> StockAggregator<'a> {
    pub fn new(items: &'a [InventoryItem], transactions: &'a [InventoryTransaction]) -> Self {
        Self { items, transactions }
    }

    pub fn find(&self, name: &str, unit: Unit) -> Option<&'a InventoryItem> {
        let key = ItemKey::new(name, unit);
        self.items.iter().find(|i| i.key() == key)
    }

    pub fn current_quantity(&self, name: &str, unit: Unit) -> Option<f64> {
        self.find(name, unit).map(|i| i.quantity)
    }

    /// Items whose status is not `InStock`, lowest quantity first.
    pub fn low_stock_items(&self) -> Vec<&'a InventoryItem> {
        let mut out: Vec<&InventoryItem> = self
            .items
            .iter()
            .filter(|i| status_of(i.quantity, i.unit) != StockStatus::InStock)
            .collect();
        out.sort_by(|a, b| a.quantity.total_cmp(&b.quantity));
        out
    }

    pub fn reconciliation(&self) -> Vec<ReconciliationLine> {
        let mut net: HashMap<ItemKey, f64> = HashMap::new();
        for tx in self.transactions {
            *net.entry(tx.key()).or_default() += tx.kind.sign() * tx.quantity;
        }

        self.items
            .iter()
            .map(|item| {
                let transaction_net = net.get(&item.key()).copied().unwrap_or(0.0);
                ReconciliationLine {
                    item_id: item.id,
                    name: item.name.clone(),
                    unit: item.unit,
                    recorded: item.quantity,
                    transaction_net,
                    drift: item.quantity - transaction_net,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stallbook_core::TransactionId;

    use crate::transaction::TransactionKind;

    fn item(name: &str, quantity: f64, unit: Unit) -> InventoryItem {
        InventoryItem {
            id: ItemId::new(),
            name: name.to_string(),
            quantity,
            unit,
            last_updated: Utc::now(),
        }
    }

    fn tx(kind: TransactionKind, name: &str, quantity: f64, unit: Unit) -> InventoryTransaction {
        InventoryTransaction {
            id: TransactionId::new(),
            date: Utc::now(),
            kind,
            name: name.to_string(),
            quantity,
            unit,
            cost: None,
            edit_history: Vec::new(),
        }
    }

    #[test]
    fn status_boundaries() {
        assert_eq!(status_of(19.0, Unit::Kg), StockStatus::InStock);
        assert_eq!(tier_of(19.0, Unit::Kg), StockTier::Watch);
        assert_eq!(status_of(9.5, Unit::Kg), StockStatus::LowStock);
        assert_eq!(status_of(10.0, Unit::Kg), StockStatus::InStock);
        assert_eq!(status_of(0.0, Unit::Pcs), StockStatus::OutOfStock);
        assert_eq!(status_of(19.0, Unit::Pcs), StockStatus::LowStock);
        assert_eq!(status_of(20.0, Unit::Pcs), StockStatus::InStock);
        assert_eq!(status_of(21.0, Unit::Pcs), StockStatus::InStock);
    }

    #[test]
    fn watch_tier_sits_below_two_and_a_half_thresholds() {
        assert_eq!(tier_of(9.0, Unit::Kg), StockTier::Low);
        assert_eq!(tier_of(24.9, Unit::Kg), StockTier::Watch);
        assert_eq!(tier_of(25.0, Unit::Kg), StockTier::Healthy);
        assert_eq!(tier_of(21.0, Unit::Pcs), StockTier::Watch);
        assert_eq!(tier_of(50.0, Unit::Pcs), StockTier::Healthy);
    }

    #[test]
    fn current_quantity_matches_case_insensitively() {
        let items = vec![item("Tahini Sauce", 5.0, Unit::L)];
        let view = StockAggregator::new(&items, &[]);

        assert_eq!(view.current_quantity("tahini sauce", Unit::L), Some(5.0));
        assert_eq!(view.current_quantity("Tahini Sauce", Unit::Ml), None);
    }

    #[test]
    fn low_stock_items_are_sorted_by_quantity() {
        let items = vec![
            item("Chicken", 20.0, Unit::Kg),
            item("Tomatoes", 8.0, Unit::Kg),
            item("Pita Bread", 0.0, Unit::Pcs),
        ];
        let view = StockAggregator::new(&items, &[]);

        let names: Vec<&str> = view.low_stock_items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Pita Bread", "Tomatoes"]);
    }

    #[test]
    fn reconciliation_reports_drift_per_item() {
        let items = vec![item("Chicken", 20.0, Unit::Kg), item("Onions", 3.0, Unit::Kg)];
        let txs = vec![
            tx(TransactionKind::Purchase, "chicken", 25.0, Unit::Kg),
            tx(TransactionKind::Usage, "Chicken", 5.0, Unit::Kg),
            tx(TransactionKind::Purchase, "Onions", 5.0, Unit::Kg),
        ];
        let view = StockAggregator::new(&items, &txs);

        let lines = view.reconciliation();
        assert!(lines[0].is_consistent());
        assert_eq!(lines[1].transaction_net, 5.0);
        assert_eq!(lines[1].drift, -2.0);
        assert!(!lines[1].is_consistent());
    }
}
