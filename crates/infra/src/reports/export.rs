//! CSV encoding of flat report rows.

use serde::Serialize;
use thiserror::Error;

use stallbook_accounting::Expense;
use stallbook_inventory::{status_of, InventoryItem, InventoryTransaction, StockStatus};
use stallbook_sales::Sale;

use super::format_pkr;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("there is no data to export")]
    NoData,

    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv output could not be flushed: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv output is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Encode rows as CSV: a header row from the field names, then one line per row.
///
/// Every cell is quoted with inner quotes doubled, so text that looks like a
/// number (an ingredient called `123`) still reads back as text.
pub fn to_csv<T: Serialize>(rows: &[T]) -> Result<String, ReportError> {
    if rows.is_empty() {
        return Err(ReportError::NoData);
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRow {
    pub id: String,
    pub date: String,
    pub variation: String,
    pub quantity: u32,
    pub amount: String,
    #[serde(rename = "type")]
    pub payment: String,
    pub edits: usize,
}

pub fn sale_rows<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> Vec<SaleRow> {
    sales
        .into_iter()
        .map(|s| SaleRow {
            id: s.id.to_string(),
            date: s.date.to_rfc3339(),
            variation: s.variation.to_string(),
            quantity: s.quantity,
            amount: format_pkr(s.amount),
            payment: s.payment.to_string(),
            edits: s.edit_history.len(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRow {
    pub id: String,
    pub date: String,
    pub amount: String,
    pub category: String,
    pub description: String,
}

pub fn expense_rows<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Vec<ExpenseRow> {
    expenses
        .into_iter()
        .map(|e| ExpenseRow {
            id: e.id.to_string(),
            date: e.date.to_rfc3339(),
            amount: format_pkr(e.amount),
            category: e.category.to_string(),
            description: e.description.clone(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRow {
    pub id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub last_updated: String,
    pub status: StockStatus,
}

pub fn inventory_rows<'a>(items: impl IntoIterator<Item = &'a InventoryItem>) -> Vec<InventoryRow> {
    items
        .into_iter()
        .map(|i| InventoryRow {
            id: i.id.to_string(),
            name: i.name.clone(),
            quantity: i.quantity,
            unit: i.unit.to_string(),
            last_updated: i.last_updated.to_rfc3339(),
            status: status_of(i.quantity, i.unit),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub cost: Option<String>,
    pub edits: usize,
}

pub fn transaction_rows<'a>(
    transactions: impl IntoIterator<Item = &'a InventoryTransaction>,
) -> Vec<TransactionRow> {
    transactions
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id.to_string(),
            date: t.date.to_rfc3339(),
            kind: t.kind.to_string(),
            name: t.name.clone(),
            quantity: t.quantity,
            unit: t.unit.to_string(),
            cost: t.cost.map(format_pkr),
            edits: t.edit_history.len(),
        })
        .collect()
}
