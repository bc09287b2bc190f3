//! Compiled report: sales and expenses merged into one ledger-style list.

use chrono::{DateTime, Utc};
use serde::Serialize;

use stallbook_accounting::Expense;
use stallbook_core::Money;
use stallbook_sales::Sale;

use super::{format_pkr, DateRange};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryType {
    Sale,
    Expense,
}

/// One line of the compiled report, with the column names of the export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Type")]
    pub entry_type: EntryType,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Amount_PKR")]
    pub amount_pkr: String,
    #[serde(rename = "Payment_Method")]
    pub payment_method: String,
}

struct Entry {
    at: DateTime<Utc>,
    entry_type: EntryType,
    description: String,
    category: String,
    amount: Money,
    payment_method: String,
}

/// Sales and expenses inside `range`, newest first.
///
/// Expenses are listed with negative amounts so the column sums to profit.
pub fn compiled_report(sales: &[Sale], expenses: &[Expense], range: &DateRange) -> Vec<CompiledRow> {
    let sale_entries = sales.iter().filter(|s| range.contains(s.date)).map(|s| {
        let name = s.variation.display_name();
        Entry {
            at: s.date,
            entry_type: EntryType::Sale,
            description: format!("{} x {name}", s.quantity),
            category: name.to_string(),
            amount: s.amount,
            payment_method: s.payment.to_string(),
        }
    });
    let expense_entries = expenses.iter().filter(|e| range.contains(e.date)).map(|e| Entry {
        at: e.date,
        entry_type: EntryType::Expense,
        description: e.description.clone(),
        category: e.category.to_string(),
        amount: -e.amount,
        payment_method: "N/A".to_string(),
    });

    let mut entries: Vec<Entry> = sale_entries.chain(expense_entries).collect();
    entries.sort_by(|a, b| b.at.cmp(&a.at));

    entries
        .into_iter()
        .map(|e| CompiledRow {
            date: e.at.format(DATE_FORMAT).to_string(),
            entry_type: e.entry_type,
            description: e.description,
            category: e.category,
            amount_pkr: format_pkr(e.amount),
            payment_method: e.payment_method,
        })
        .collect()
}
