//! The shop's whole mutable state: inventory ledger, sales and expenses.

use chrono::{DateTime, Utc};

use stallbook_accounting::{Expense, ExpenseBook, NewExpense};
use stallbook_core::{DomainResult, ExpenseId, ItemId, SaleId, TransactionId};
use stallbook_inventory::{
    InventoryItem, InventoryLedger, InventoryTransaction, PurchaseInput, TransactionValues,
    UsageOutcome,
};
use stallbook_sales::{NewSale, Sale, SaleValues, SalesBook};

use crate::store::Snapshot;

/// A committed purchase, with the supplies expense it booked (if any).
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseReceipt {
    pub transaction: InventoryTransaction,
    pub item: InventoryItem,
    pub item_created: bool,
    pub expense: Option<Expense>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShopState {
    ledger: InventoryLedger,
    sales: SalesBook,
    expenses: ExpenseBook,
}

impl ShopState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the state from a loaded snapshot, checking every invariant.
    pub fn from_snapshot(snapshot: Snapshot) -> DomainResult<Self> {
        Ok(Self {
            ledger: InventoryLedger::from_parts(snapshot.inventory, snapshot.inventory_transactions)?,
            sales: SalesBook::from_records(snapshot.sales)?,
            expenses: ExpenseBook::from_records(snapshot.expenses)?,
        })
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            sales: self.sales.records().to_vec(),
            expenses: self.expenses.records().to_vec(),
            inventory: self.ledger.items().to_vec(),
            inventory_transactions: self.ledger.transactions().to_vec(),
        }
    }

    pub fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    pub fn sales(&self) -> &SalesBook {
        &self.sales
    }

    pub fn expenses(&self) -> &ExpenseBook {
        &self.expenses
    }

    /// Record a purchase; a positive cost also books a supplies expense.
    pub fn record_purchase(
        &mut self,
        input: PurchaseInput,
        at: DateTime<Utc>,
    ) -> DomainResult<PurchaseReceipt> {
        let outcome = self.ledger.record_purchase(input, at)?;
        let expense = match outcome.expense {
            Some(derived) => Some(self.expenses.record_derived(ExpenseId::new(), derived, at)?.clone()),
            None => None,
        };

        Ok(PurchaseReceipt {
            transaction: outcome.transaction,
            item: outcome.item,
            item_created: outcome.item_created,
            expense,
        })
    }

    pub fn record_usage(
        &mut self,
        item_id: ItemId,
        quantity: f64,
        at: DateTime<Utc>,
    ) -> DomainResult<UsageOutcome> {
        self.ledger.record_usage(item_id, quantity, at)
    }

    pub fn edit_transaction(
        &mut self,
        transaction_id: TransactionId,
        values: TransactionValues,
        at: DateTime<Utc>,
    ) -> DomainResult<InventoryTransaction> {
        self.ledger.edit_transaction(transaction_id, values, at)
    }

    pub fn record_sale(&mut self, input: NewSale, at: DateTime<Utc>) -> DomainResult<Sale> {
        self.sales.record_sale(input, at)
    }

    pub fn edit_sale(
        &mut self,
        sale_id: SaleId,
        values: SaleValues,
        at: DateTime<Utc>,
    ) -> DomainResult<Sale> {
        self.sales.edit_sale(sale_id, values, at)
    }

    pub fn record_expense(&mut self, input: NewExpense, at: DateTime<Utc>) -> DomainResult<Expense> {
        self.expenses
            .record_expense(ExpenseId::new(), input, at)
            .cloned()
    }
}
