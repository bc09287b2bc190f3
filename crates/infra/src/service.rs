//! Application service: the one owner of the live shop state.
//!
//! Every mutation follows the same pipeline:
//!
//! ```text
//! lock state
//!   ↓
//! 1. clone the live state into a draft
//!   ↓
//! 2. run the domain operation on the draft (validation rejects here)
//!   ↓
//! 3. save the draft's full snapshot
//!   ↓
//! 4. replace the live state with the draft
//! ```
//!
//! A rejected operation or a failed save leaves the live state untouched.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use thiserror::Error;

use stallbook_accounting::{Expense, NewExpense};
use stallbook_core::{DomainError, DomainResult, ItemId, SaleId, TransactionId};
use stallbook_inventory::{
    InventoryItem, InventoryTransaction, PurchaseInput, ReconciliationLine, TransactionValues,
    UsageOutcome,
};
use stallbook_sales::{NewSale, Sale, SaleValues};

use crate::reports::{self, DashboardSummary, DateRange, ReportError};
use crate::shop::{PurchaseReceipt, ShopState};
use crate::store::{SnapshotStore, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("persistence failed: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Which collection a CSV export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Sales,
    Expenses,
    Inventory,
    Transactions,
}

#[derive(Debug)]
pub struct ShopService<S> {
    store: S,
    state: Mutex<ShopState>,
}

impl<S: SnapshotStore> ShopService<S> {
    /// Load the snapshot from `store` and check it.
    pub fn load(store: S) -> Result<Self, ServiceError> {
        let snapshot = store.load()?;
        let state = ShopState::from_snapshot(snapshot)?;
        tracing::info!(
            items = state.ledger().items().len(),
            transactions = state.ledger().transactions().len(),
            sales = state.sales().records().len(),
            expenses = state.expenses().records().len(),
            "shop state loaded"
        );
        Ok(Self {
            store,
            state: Mutex::new(state),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn lock(&self) -> MutexGuard<'_, ShopState> {
        // A panic mid-operation never touches the live state, so it is safe to keep using.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn mutate<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut ShopState) -> DomainResult<T>,
    ) -> Result<T, ServiceError> {
        let mut live = self.lock();
        let mut draft = live.clone();

        let out = f(&mut draft).inspect_err(|e| {
            tracing::debug!(operation, error = %e, "operation rejected");
        })?;

        self.store.save(&draft.to_snapshot()).inspect_err(|e| {
            tracing::error!(operation, error = %e, "snapshot save failed; state unchanged");
        })?;

        *live = draft;
        Ok(out)
    }

    /// Run a read-only query against the live state.
    pub fn read<T>(&self, f: impl FnOnce(&ShopState) -> T) -> T {
        let state = self.lock();
        f(&*state)
    }

    pub fn record_purchase(&self, input: PurchaseInput) -> Result<PurchaseReceipt, ServiceError> {
        let receipt = self.mutate("record_purchase", |s| s.record_purchase(input, Utc::now()))?;
        tracing::info!(
            transaction_id = %receipt.transaction.id,
            item_id = %receipt.item.id,
            name = %receipt.item.name,
            quantity = receipt.transaction.quantity,
            unit = %receipt.item.unit,
            item_created = receipt.item_created,
            expense_booked = receipt.expense.is_some(),
            "purchase recorded"
        );
        Ok(receipt)
    }

    pub fn record_usage(&self, item_id: ItemId, quantity: f64) -> Result<UsageOutcome, ServiceError> {
        let outcome = self
            .mutate("record_usage", |s| s.record_usage(item_id, quantity, Utc::now()))
            .inspect_err(|e| {
                if let ServiceError::Domain(DomainError::InsufficientStock { name, requested, available, .. }) = e {
                    tracing::warn!(%item_id, %name, requested, available, "usage exceeds stock");
                }
            })?;
        tracing::info!(
            transaction_id = %outcome.transaction.id,
            %item_id,
            quantity,
            remaining = outcome.item.quantity,
            "usage recorded"
        );
        Ok(outcome)
    }

    pub fn edit_transaction(
        &self,
        transaction_id: TransactionId,
        values: TransactionValues,
    ) -> Result<InventoryTransaction, ServiceError> {
        let edited = self.mutate("edit_transaction", |s| {
            s.edit_transaction(transaction_id, values, Utc::now())
        })?;
        tracing::info!(%transaction_id, revision = edited.revision(), "transaction edited");
        Ok(edited)
    }

    pub fn record_sale(&self, input: NewSale) -> Result<Sale, ServiceError> {
        let sale = self.mutate("record_sale", |s| s.record_sale(input, Utc::now()))?;
        tracing::info!(
            sale_id = %sale.id,
            variation = %sale.variation,
            quantity = sale.quantity,
            amount = sale.amount,
            "sale recorded"
        );
        Ok(sale)
    }

    pub fn edit_sale(&self, sale_id: SaleId, values: SaleValues) -> Result<Sale, ServiceError> {
        let sale = self.mutate("edit_sale", |s| s.edit_sale(sale_id, values, Utc::now()))?;
        tracing::info!(%sale_id, edits = sale.edit_history.len(), "sale edited");
        Ok(sale)
    }

    pub fn record_expense(&self, input: NewExpense) -> Result<Expense, ServiceError> {
        let expense = self.mutate("record_expense", |s| s.record_expense(input, Utc::now()))?;
        tracing::info!(
            expense_id = %expense.id,
            category = %expense.category,
            amount = expense.amount,
            "expense recorded"
        );
        Ok(expense)
    }

    pub fn inventory(&self) -> Vec<InventoryItem> {
        self.read(|s| s.ledger().items().to_vec())
    }

    pub fn transactions(&self) -> Vec<InventoryTransaction> {
        self.read(|s| s.ledger().transactions_newest_first().into_iter().cloned().collect())
    }

    pub fn sales(&self) -> Vec<Sale> {
        self.read(|s| s.sales().newest_first().into_iter().cloned().collect())
    }

    pub fn expenses(&self) -> Vec<Expense> {
        self.read(|s| s.expenses().newest_first().into_iter().cloned().collect())
    }

    pub fn reconciliation(&self) -> Vec<ReconciliationLine> {
        self.read(|s| s.ledger().stock().reconciliation())
    }

    pub fn summary(&self, range: &DateRange) -> DashboardSummary {
        self.read(|s| reports::dashboard_summary(s, range))
    }

    pub fn compiled_report_csv(&self, range: &DateRange) -> Result<String, ServiceError> {
        let rows = self.read(|s| {
            reports::compiled_report(s.sales().records(), s.expenses().records(), range)
        });
        Ok(reports::to_csv(&rows)?)
    }

    /// CSV export of one whole collection, newest first where it has dates.
    pub fn collection_csv(&self, collection: Collection) -> Result<String, ServiceError> {
        let csv = self.read(|s| match collection {
            Collection::Sales => reports::to_csv(&reports::sale_rows(s.sales().newest_first())),
            Collection::Expenses => {
                reports::to_csv(&reports::expense_rows(s.expenses().newest_first()))
            }
            Collection::Inventory => reports::to_csv(&reports::inventory_rows(s.ledger().items())),
            Collection::Transactions => reports::to_csv(&reports::transaction_rows(
                s.ledger().transactions_newest_first(),
            )),
        })?;
        Ok(csv)
    }
}
