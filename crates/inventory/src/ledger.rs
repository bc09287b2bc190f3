//! The inventory ledger: transaction log + current stock, updated in pairs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stallbook_accounting::NewExpense;
use stallbook_core::{
    entity, Aggregate, DomainError, DomainResult, ItemId, Money, TransactionId,
};

use crate::item::{InventoryItem, ItemKey};
use crate::stock::StockAggregator;
use crate::transaction::{
    validate_cost, validate_name, validate_quantity, InventoryTransaction, TransactionKind,
    TransactionValues,
};
use crate::unit::Unit;

/// Command: RecordPurchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPurchase {
    pub transaction_id: TransactionId,
    /// Used only when no item matches the purchase's key.
    pub new_item_id: ItemId,
    pub name: String,
    pub quantity: f64,
    pub unit: Unit,
    pub cost: Option<Money>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordUsage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordUsage {
    pub transaction_id: TransactionId,
    pub item_id: ItemId,
    pub quantity: f64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: EditTransaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditTransaction {
    pub transaction_id: TransactionId,
    pub values: TransactionValues,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerCommand {
    RecordPurchase(RecordPurchase),
    RecordUsage(RecordUsage),
    EditTransaction(EditTransaction),
}

/// Event: PurchaseRecorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecorded {
    pub transaction_id: TransactionId,
    pub item_id: ItemId,
    pub item_created: bool,
    pub name: String,
    pub quantity: f64,
    pub unit: Unit,
    pub cost: Option<Money>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: UsageRecorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecorded {
    pub transaction_id: TransactionId,
    pub item_id: ItemId,
    pub name: String,
    pub quantity: f64,
    pub unit: Unit,
    pub occurred_at: DateTime<Utc>,
}

/// Event: TransactionEdited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionEdited {
    pub transaction_id: TransactionId,
    pub values: TransactionValues,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerEvent {
    PurchaseRecorded(PurchaseRecorded),
    UsageRecorded(UsageRecorded),
    TransactionEdited(TransactionEdited),
}

impl LedgerEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::PurchaseRecorded(_) => "inventory.purchase_recorded",
            LedgerEvent::UsageRecorded(_) => "inventory.usage_recorded",
            LedgerEvent::TransactionEdited(_) => "inventory.transaction_edited",
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::PurchaseRecorded(e) => e.occurred_at,
            LedgerEvent::UsageRecorded(e) => e.occurred_at,
            LedgerEvent::TransactionEdited(e) => e.occurred_at,
        }
    }
}

/// Purchase form input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseInput {
    pub name: String,
    pub quantity: f64,
    pub unit: Unit,
    #[serde(default)]
    pub cost: Option<Money>,
}

/// Result of a recorded purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOutcome {
    pub transaction: InventoryTransaction,
    pub item: InventoryItem,
    pub item_created: bool,
    /// Supplies expense to book when the purchase carried a positive cost.
    pub expense: Option<NewExpense>,
}

/// Result of a recorded usage.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageOutcome {
    pub transaction: InventoryTransaction,
    pub item: InventoryItem,
}

/// Aggregate: the shop's inventory ledger.
///
/// Holds the transaction log and the current item quantities. Both are only
/// changed together, when a purchase or usage is recorded. Editing a
/// transaction rewrites the log entry (keeping its history) and leaves item
/// quantities alone; [`StockAggregator::reconciliation`] shows any drift.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryLedger {
    items: Vec<InventoryItem>,
    transactions: Vec<InventoryTransaction>,
    version: u64,
}

impl InventoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the ledger from persisted records, checking its invariants.
    pub fn from_parts(
        items: Vec<InventoryItem>,
        transactions: Vec<InventoryTransaction>,
    ) -> DomainResult<Self> {
        if let Some(id) = entity::first_duplicate_id(&items) {
            return Err(DomainError::invariant(format!("duplicate inventory item id {id}")));
        }
        if let Some(id) = entity::first_duplicate_id(&transactions) {
            return Err(DomainError::invariant(format!("duplicate transaction id {id}")));
        }
        if let Some(item) = items.iter().find(|i| !i.quantity.is_finite() || i.quantity < 0.0) {
            return Err(DomainError::invariant(format!(
                "item {} ({}) has invalid quantity {}",
                item.id, item.name, item.quantity
            )));
        }

        let mut keys = std::collections::HashSet::with_capacity(items.len());
        for item in &items {
            if !keys.insert(item.key()) {
                return Err(DomainError::invariant(format!(
                    "more than one item for {} ({})",
                    item.name, item.unit
                )));
            }
        }

        Ok(Self {
            items,
            transactions,
            version: 0,
        })
    }

    pub fn into_parts(self) -> (Vec<InventoryItem>, Vec<InventoryTransaction>) {
        (self.items, self.transactions)
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn transactions(&self) -> &[InventoryTransaction] {
        &self.transactions
    }

    pub fn item(&self, id: &ItemId) -> Option<&InventoryItem> {
        entity::find(&self.items, id)
    }

    pub fn transaction(&self, id: &TransactionId) -> Option<&InventoryTransaction> {
        entity::find(&self.transactions, id)
    }

    /// Transactions ordered newest first (the order the history table shows).
    pub fn transactions_newest_first(&self) -> Vec<&InventoryTransaction> {
        let mut out: Vec<&InventoryTransaction> = self.transactions.iter().collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        out
    }

    pub fn stock(&self) -> StockAggregator<'_> {
        StockAggregator::new(&self.items, &self.transactions)
    }

    /// Record an ingredient purchase.
    pub fn record_purchase(
        &mut self,
        input: PurchaseInput,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<PurchaseOutcome> {
        let command = LedgerCommand::RecordPurchase(RecordPurchase {
            transaction_id: TransactionId::new(),
            new_item_id: ItemId::new(),
            name: input.name,
            quantity: input.quantity,
            unit: input.unit,
            cost: input.cost,
            occurred_at,
        });

        let events = self.execute(&command)?;
        let Some(LedgerEvent::PurchaseRecorded(e)) = events.into_iter().next() else {
            return Err(DomainError::invariant("purchase produced no event"));
        };

        let expense = e
            .cost
            .filter(|c| *c > 0)
            .map(|c| NewExpense::from_purchase(&e.name, e.quantity, e.unit.as_str(), c));

        Ok(PurchaseOutcome {
            transaction: self.recorded_transaction(&e.transaction_id)?,
            item: self.recorded_item(&e.item_id)?,
            item_created: e.item_created,
            expense,
        })
    }

    /// Record usage of an ingredient already in stock.
    pub fn record_usage(
        &mut self,
        item_id: ItemId,
        quantity: f64,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<UsageOutcome> {
        let transaction_id = TransactionId::new();
        let command = LedgerCommand::RecordUsage(RecordUsage {
            transaction_id,
            item_id,
            quantity,
            occurred_at,
        });

        self.execute(&command)?;

        Ok(UsageOutcome {
            transaction: self.recorded_transaction(&transaction_id)?,
            item: self.recorded_item(&item_id)?,
        })
    }

    /// Rewrite a transaction's fields, keeping the previous values in its history.
    ///
    /// Item quantities are not touched.
    pub fn edit_transaction(
        &mut self,
        transaction_id: TransactionId,
        values: TransactionValues,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<InventoryTransaction> {
        let command = LedgerCommand::EditTransaction(EditTransaction {
            transaction_id,
            values,
            occurred_at,
        });

        self.execute(&command)?;
        self.recorded_transaction(&transaction_id)
    }

    fn recorded_transaction(&self, id: &TransactionId) -> DomainResult<InventoryTransaction> {
        self.transaction(id)
            .cloned()
            .ok_or_else(|| DomainError::invariant(format!("transaction {id} missing after apply")))
    }

    fn recorded_item(&self, id: &ItemId) -> DomainResult<InventoryItem> {
        self.item(id)
            .cloned()
            .ok_or_else(|| DomainError::invariant(format!("item {id} missing after apply")))
    }

    fn find_by_key(&self, key: &ItemKey) -> Option<&InventoryItem> {
        self.items.iter().find(|i| &i.key() == key)
    }

    fn ensure_new_transaction_id(&self, id: &TransactionId) -> DomainResult<()> {
        if self.transaction(id).is_some() {
            return Err(DomainError::invalid_id(format!("transaction {id} already exists")));
        }
        Ok(())
    }

    fn handle_purchase(&self, cmd: &RecordPurchase) -> DomainResult<Vec<LedgerEvent>> {
        let name = validate_name(&cmd.name)?;
        validate_quantity(cmd.quantity)?;
        validate_cost(cmd.cost)?;
        self.ensure_new_transaction_id(&cmd.transaction_id)?;

        let (item_id, item_created) = match self.find_by_key(&ItemKey::new(&name, cmd.unit)) {
            Some(existing) => {
                if !(existing.quantity + cmd.quantity).is_finite() {
                    return Err(DomainError::validation(format!(
                        "purchase would push {} beyond a representable quantity",
                        existing.name
                    )));
                }
                (existing.id, false)
            }
            None => (cmd.new_item_id, true),
        };

        Ok(vec![LedgerEvent::PurchaseRecorded(PurchaseRecorded {
            transaction_id: cmd.transaction_id,
            item_id,
            item_created,
            name,
            quantity: cmd.quantity,
            unit: cmd.unit,
            cost: cmd.cost,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_usage(&self, cmd: &RecordUsage) -> DomainResult<Vec<LedgerEvent>> {
        validate_quantity(cmd.quantity)?;
        self.ensure_new_transaction_id(&cmd.transaction_id)?;

        let item = self
            .item(&cmd.item_id)
            .ok_or_else(|| DomainError::not_found("inventory item"))?;

        if cmd.quantity > item.quantity {
            return Err(DomainError::insufficient_stock(
                item.name.clone(),
                cmd.quantity,
                item.quantity,
                item.unit.as_str(),
            ));
        }

        Ok(vec![LedgerEvent::UsageRecorded(UsageRecorded {
            transaction_id: cmd.transaction_id,
            item_id: item.id,
            name: item.name.clone(),
            quantity: cmd.quantity,
            unit: item.unit,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_edit(&self, cmd: &EditTransaction) -> DomainResult<Vec<LedgerEvent>> {
        if self.transaction(&cmd.transaction_id).is_none() {
            return Err(DomainError::not_found("inventory transaction"));
        }
        let values = cmd.values.clone().normalized()?;

        Ok(vec![LedgerEvent::TransactionEdited(TransactionEdited {
            transaction_id: cmd.transaction_id,
            values,
            occurred_at: cmd.occurred_at,
        })])
    }
}

impl Aggregate for InventoryLedger {
    type Command = LedgerCommand;
    type Event = LedgerEvent;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LedgerEvent::PurchaseRecorded(e) => {
                if e.item_created {
                    self.items.push(InventoryItem {
                        id: e.item_id,
                        name: e.name.clone(),
                        quantity: e.quantity,
                        unit: e.unit,
                        last_updated: e.occurred_at,
                    });
                } else if let Some(item) = entity::find_mut(&mut self.items, &e.item_id) {
                    item.quantity += e.quantity;
                    item.last_updated = e.occurred_at;
                }

                self.transactions.push(InventoryTransaction {
                    id: e.transaction_id,
                    date: e.occurred_at,
                    kind: TransactionKind::Purchase,
                    name: e.name.clone(),
                    quantity: e.quantity,
                    unit: e.unit,
                    cost: e.cost,
                    edit_history: Vec::new(),
                });
            }
            LedgerEvent::UsageRecorded(e) => {
                if let Some(item) = entity::find_mut(&mut self.items, &e.item_id) {
                    item.quantity -= e.quantity;
                    item.last_updated = e.occurred_at;
                }

                self.transactions.push(InventoryTransaction {
                    id: e.transaction_id,
                    date: e.occurred_at,
                    kind: TransactionKind::Usage,
                    name: e.name.clone(),
                    quantity: e.quantity,
                    unit: e.unit,
                    cost: None,
                    edit_history: Vec::new(),
                });
            }
            LedgerEvent::TransactionEdited(e) => {
                if let Some(tx) = entity::find_mut(&mut self.transactions, &e.transaction_id) {
                    tx.overwrite(e.values.clone(), e.occurred_at);
                }
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LedgerCommand::RecordPurchase(cmd) => self.handle_purchase(cmd),
            LedgerCommand::RecordUsage(cmd) => self.handle_usage(cmd),
            LedgerCommand::EditTransaction(cmd) => self.handle_edit(cmd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use stallbook_accounting::ExpenseCategory;

    use crate::stock::{status_of, StockStatus};

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 10, 26, 10, 0, 0).unwrap()
    }

    fn purchase(name: &str, quantity: f64, unit: Unit, cost: Option<Money>) -> PurchaseInput {
        PurchaseInput {
            name: name.to_string(),
            quantity,
            unit,
            cost,
        }
    }

    #[test]
    fn purchase_of_new_ingredient_creates_one_item_and_one_transaction() {
        let mut ledger = InventoryLedger::new();

        let out = ledger
            .record_purchase(purchase("Chicken", 10.0, Unit::Kg, None), test_time())
            .unwrap();

        assert!(out.item_created);
        assert_eq!(ledger.items().len(), 1);
        assert_eq!(ledger.items()[0].quantity, 10.0);
        assert_eq!(ledger.transactions().len(), 1);
        assert_eq!(ledger.transactions()[0].kind, TransactionKind::Purchase);
        assert_eq!(out.transaction.id, ledger.transactions()[0].id);
        assert_eq!(ledger.version(), 1);
    }

    #[test]
    fn purchase_of_existing_ingredient_increments_it() {
        let mut ledger = InventoryLedger::new();
        let first = ledger
            .record_purchase(purchase("Chicken", 10.0, Unit::Kg, None), test_time())
            .unwrap();

        let later = test_time() + chrono::Duration::hours(2);
        let second = ledger
            .record_purchase(purchase("chicken", 5.5, Unit::Kg, None), later)
            .unwrap();

        assert!(!second.item_created);
        assert_eq!(second.item.id, first.item.id);
        assert_eq!(ledger.items().len(), 1);
        assert_eq!(ledger.items()[0].quantity, 15.5);
        assert_eq!(ledger.items()[0].name, "Chicken");
        assert_eq!(ledger.items()[0].last_updated, later);
        assert_eq!(ledger.transactions().len(), 2);
    }

    #[test]
    fn same_name_in_another_unit_is_a_separate_item() {
        let mut ledger = InventoryLedger::new();
        ledger
            .record_purchase(purchase("Garlic", 1.0, Unit::Kg, None), test_time())
            .unwrap();
        ledger
            .record_purchase(purchase("Garlic", 200.0, Unit::G, None), test_time())
            .unwrap();

        assert_eq!(ledger.items().len(), 2);
    }

    #[test]
    fn invalid_purchase_is_rejected_without_mutation() {
        let mut ledger = InventoryLedger::new();

        for input in [
            purchase("Chicken", 0.0, Unit::Kg, None),
            purchase("Chicken", -3.0, Unit::Kg, None),
            purchase("  ", 3.0, Unit::Kg, None),
            purchase("Chicken", 3.0, Unit::Kg, Some(-1)),
        ] {
            let err = ledger.record_purchase(input, test_time()).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }

        assert!(ledger.items().is_empty());
        assert!(ledger.transactions().is_empty());
        assert_eq!(ledger.version(), 0);
    }

    #[test]
    fn purchase_overflowing_the_stock_total_is_rejected() {
        let mut ledger = InventoryLedger::new();
        ledger
            .record_purchase(purchase("Salt", 1e308, Unit::Kg, None), test_time())
            .unwrap();

        let err = ledger
            .record_purchase(purchase("salt", 1e308, Unit::Kg, None), test_time())
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(ledger.items()[0].quantity, 1e308);
        assert_eq!(ledger.transactions().len(), 1);
        assert_eq!(ledger.version(), 1);
    }

    #[test]
    fn costed_purchase_yields_one_supplies_expense() {
        let mut ledger = InventoryLedger::new();

        let out = ledger
            .record_purchase(purchase("Chicken", 25.0, Unit::Kg, Some(5000)), test_time())
            .unwrap();
        let expense = out.expense.expect("expense for costed purchase");
        assert_eq!(expense.amount, 5000);
        assert_eq!(expense.category, ExpenseCategory::Supplies);
        assert_eq!(expense.description, "Purchase: 25 kg of Chicken");

        let free = ledger
            .record_purchase(purchase("Onions", 2.0, Unit::Kg, Some(0)), test_time())
            .unwrap();
        assert!(free.expense.is_none());

        let uncosted = ledger
            .record_purchase(purchase("Onions", 2.0, Unit::Kg, None), test_time())
            .unwrap();
        assert!(uncosted.expense.is_none());
    }

    #[test]
    fn usage_above_stock_is_rejected_and_changes_nothing() {
        let mut ledger = InventoryLedger::new();
        let item = ledger
            .record_purchase(purchase("Tomatoes", 8.0, Unit::Kg, None), test_time())
            .unwrap()
            .item;
        let before = ledger.clone();

        let err = ledger.record_usage(item.id, 8.5, test_time()).unwrap_err();

        match err {
            DomainError::InsufficientStock {
                name,
                requested,
                available,
                unit,
            } => {
                assert_eq!(name, "Tomatoes");
                assert_eq!(requested, 8.5);
                assert_eq!(available, 8.0);
                assert_eq!(unit, "kg");
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
        assert_eq!(ledger, before);
    }

    #[test]
    fn usage_of_entire_stock_leaves_zero_and_out_of_stock() {
        let mut ledger = InventoryLedger::new();
        let item = ledger
            .record_purchase(purchase("Pita Bread", 100.0, Unit::Pcs, None), test_time())
            .unwrap()
            .item;

        let out = ledger.record_usage(item.id, 100.0, test_time()).unwrap();

        assert_eq!(out.item.quantity, 0.0);
        assert_eq!(status_of(out.item.quantity, out.item.unit), StockStatus::OutOfStock);
        assert_eq!(out.transaction.kind, TransactionKind::Usage);
        assert_eq!(out.transaction.name, "Pita Bread");
        assert_eq!(out.transaction.unit, Unit::Pcs);
        assert_eq!(out.transaction.cost, None);
        assert_eq!(ledger.transactions().len(), 2);
    }

    #[test]
    fn usage_of_unknown_item_is_not_found() {
        let mut ledger = InventoryLedger::new();
        let err = ledger.record_usage(ItemId::new(), 1.0, test_time()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn usage_with_non_positive_quantity_is_invalid() {
        let mut ledger = InventoryLedger::new();
        let item = ledger
            .record_purchase(purchase("Onions", 5.0, Unit::Kg, None), test_time())
            .unwrap()
            .item;

        let err = ledger.record_usage(item.id, 0.0, test_time()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn edit_appends_one_history_entry_with_pre_edit_values() {
        let mut ledger = InventoryLedger::new();
        let out = ledger
            .record_purchase(purchase("Chicken", 25.0, Unit::Kg, Some(20_000)), test_time())
            .unwrap();
        let before = out.transaction.values();
        let edited_at = test_time() + chrono::Duration::days(1);

        let edited = ledger
            .edit_transaction(
                out.transaction.id,
                TransactionValues {
                    kind: TransactionKind::Purchase,
                    name: "Chicken".to_string(),
                    quantity: 30.0,
                    unit: Unit::Kg,
                    cost: Some(24_000),
                },
                edited_at,
            )
            .unwrap();

        assert_eq!(edited.edit_history.len(), 1);
        assert_eq!(edited.edit_history[0].original_values, before);
        assert_eq!(edited.edit_history[0].edited_at, edited_at);
        assert_eq!(edited.quantity, 30.0);
        assert_eq!(edited.cost, Some(24_000));
        assert_eq!(edited.date, test_time());
    }

    #[test]
    fn edit_does_not_reconcile_item_quantity() {
        let mut ledger = InventoryLedger::new();
        let out = ledger
            .record_purchase(purchase("Chicken", 25.0, Unit::Kg, None), test_time())
            .unwrap();

        ledger
            .edit_transaction(
                out.transaction.id,
                TransactionValues {
                    kind: TransactionKind::Purchase,
                    name: "Chicken".to_string(),
                    quantity: 40.0,
                    unit: Unit::Kg,
                    cost: None,
                },
                test_time(),
            )
            .unwrap();

        assert_eq!(ledger.items()[0].quantity, 25.0);
        let line = &ledger.stock().reconciliation()[0];
        assert_eq!(line.transaction_net, 40.0);
        assert_eq!(line.drift, -15.0);
    }

    #[test]
    fn edit_to_usage_clears_cost() {
        let mut ledger = InventoryLedger::new();
        let out = ledger
            .record_purchase(purchase("Lettuce", 5.0, Unit::Kg, Some(900)), test_time())
            .unwrap();

        let edited = ledger
            .edit_transaction(
                out.transaction.id,
                TransactionValues {
                    kind: TransactionKind::Usage,
                    name: "Lettuce".to_string(),
                    quantity: 5.0,
                    unit: Unit::Kg,
                    cost: Some(900),
                },
                test_time(),
            )
            .unwrap();

        assert_eq!(edited.cost, None);
        assert_eq!(edited.edit_history[0].original_values.cost, Some(900));
    }

    #[test]
    fn edit_of_unknown_or_invalid_is_rejected() {
        let mut ledger = InventoryLedger::new();
        let out = ledger
            .record_purchase(purchase("Lettuce", 5.0, Unit::Kg, None), test_time())
            .unwrap();
        let mut values = out.transaction.values();

        let err = ledger
            .edit_transaction(TransactionId::new(), values.clone(), test_time())
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        values.quantity = -1.0;
        let err = ledger
            .edit_transaction(out.transaction.id, values, test_time())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(ledger.transactions()[0].edit_history.is_empty());
    }

    #[test]
    fn from_parts_rejects_duplicate_keys_and_negative_stock() {
        let item = |name: &str, quantity: f64| InventoryItem {
            id: ItemId::new(),
            name: name.to_string(),
            quantity,
            unit: Unit::Kg,
            last_updated: test_time(),
        };

        let err = InventoryLedger::from_parts(vec![item("Chicken", 1.0), item("CHICKEN", 2.0)], vec![])
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        let err = InventoryLedger::from_parts(vec![item("Chicken", -1.0)], vec![]).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        assert!(InventoryLedger::from_parts(vec![item("Chicken", 0.0)], vec![]).is_ok());
    }

    #[test]
    fn handle_is_pure_and_reuses_existing_item_id() {
        let mut ledger = InventoryLedger::new();
        let existing = ledger
            .record_purchase(purchase("Onions", 5.0, Unit::Kg, None), test_time())
            .unwrap()
            .item;

        let cmd = LedgerCommand::RecordPurchase(RecordPurchase {
            transaction_id: TransactionId::new(),
            new_item_id: ItemId::new(),
            name: "ONIONS".to_string(),
            quantity: 1.0,
            unit: Unit::Kg,
            cost: None,
            occurred_at: test_time(),
        });

        let events = ledger.handle(&cmd).unwrap();
        assert_eq!(ledger.transactions().len(), 1);
        match &events[0] {
            LedgerEvent::PurchaseRecorded(e) => {
                assert_eq!(e.item_id, existing.id);
                assert!(!e.item_created);
                assert_eq!(e.name, "ONIONS");
            }
            other => panic!("expected PurchaseRecorded, got {other:?}"),
        }
        assert_eq!(events[0].event_type(), "inventory.purchase_recorded");
    }

    #[derive(Debug, Clone)]
    enum Op {
        Purchase { ingredient: usize, quantity: f64 },
        Usage { ingredient: usize, quantity: f64 },
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..3, 0.5f64..50.0).prop_map(|(ingredient, quantity)| Op::Purchase { ingredient, quantity }),
            (0usize..3, 0.5f64..80.0).prop_map(|(ingredient, quantity)| Op::Usage { ingredient, quantity }),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: for any interleaving of purchases and usages, no item
        /// quantity goes negative and over-large usage is rejected, not clamped.
        #[test]
        fn stock_never_goes_negative(ops in prop::collection::vec(op_strategy(), 1..60)) {
            let names = ["Chicken", "Onions", "Pita Bread"];
            let mut ledger = InventoryLedger::new();

            for op in ops {
                match op {
                    Op::Purchase { ingredient, quantity } => {
                        ledger
                            .record_purchase(purchase(names[ingredient], quantity, Unit::Kg, None), test_time())
                            .unwrap();
                    }
                    Op::Usage { ingredient, quantity } => {
                        let Some(item) = ledger.stock().find(names[ingredient], Unit::Kg).cloned() else {
                            continue;
                        };
                        let tx_count = ledger.transactions().len();

                        match ledger.record_usage(item.id, quantity, test_time()) {
                            Ok(out) => {
                                prop_assert!(quantity <= item.quantity);
                                prop_assert_eq!(out.item.quantity, item.quantity - quantity);
                            }
                            Err(DomainError::InsufficientStock { available, .. }) => {
                                prop_assert!(quantity > item.quantity);
                                prop_assert_eq!(available, item.quantity);
                                prop_assert_eq!(ledger.item(&item.id).unwrap().quantity, item.quantity);
                                prop_assert_eq!(ledger.transactions().len(), tx_count);
                            }
                            Err(other) => prop_assert!(false, "unexpected error {other:?}"),
                        }
                    }
                }

                for item in ledger.items() {
                    prop_assert!(item.quantity >= 0.0);
                }
            }

            for line in ledger.stock().reconciliation() {
                prop_assert!(line.drift.abs() < 1e-6);
            }
        }
    }
}
