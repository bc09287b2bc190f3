//! Read-side reports over the shop state: dashboard figures and CSV exports.

pub mod compiled;
pub mod export;
pub mod summary;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stallbook_core::Money;

pub use compiled::{compiled_report, CompiledRow, EntryType};
pub use export::{
    expense_rows, inventory_rows, sale_rows, to_csv, transaction_rows, ExpenseRow, InventoryRow,
    ReportError, SaleRow, TransactionRow,
};
pub use summary::{dashboard_summary, DailyTotals, DashboardSummary, LowStockLine, VariationTotal};

/// Inclusive date range; an open end matches everything on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| at >= from) && self.to.is_none_or(|to| at <= to)
    }
}

/// Format paisa as rupees with two decimals (`-1500.00`).
pub fn format_pkr(amount: Money) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}
