//! Inventory domain module.
//!
//! This crate contains the ingredient ledger: the purchase/usage transaction
//! log, the current stock per ingredient, and the read-side stock queries.
//! It is deterministic domain logic (no IO, no HTTP, no storage).

pub mod item;
pub mod ledger;
pub mod stock;
pub mod transaction;
pub mod unit;

pub use item::{InventoryItem, ItemKey};
pub use ledger::{
    EditTransaction, InventoryLedger, LedgerCommand, LedgerEvent, PurchaseInput, PurchaseOutcome,
    PurchaseRecorded, RecordPurchase, RecordUsage, TransactionEdited, UsageOutcome, UsageRecorded,
};
pub use stock::{status_of, tier_of, ReconciliationLine, StockAggregator, StockStatus, StockTier};
pub use transaction::{InventoryTransaction, TransactionEdit, TransactionKind, TransactionValues};
pub use unit::Unit;
