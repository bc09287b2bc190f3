//! Dashboard figures.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use stallbook_core::{ItemId, Money};
use stallbook_inventory::{status_of, tier_of, StockStatus, StockTier, Unit};
use stallbook_sales::SaleVariation;

use super::DateRange;
use crate::shop::ShopState;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationTotal {
    pub variation: SaleVariation,
    pub name: &'static str,
    pub quantity: u64,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotals {
    pub day: NaiveDate,
    pub sales: Money,
    pub expenses: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockLine {
    pub id: ItemId,
    pub name: String,
    pub quantity: f64,
    pub unit: Unit,
    pub status: StockStatus,
    pub tier: StockTier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_sales: Money,
    pub total_expenses: Money,
    pub net_profit: Money,
    pub sales_count: usize,
    pub items_sold: u64,
    /// Every menu variation, in menu order, including unsold ones.
    pub by_variation: Vec<VariationTotal>,
    /// One entry per UTC day with any sale or expense, oldest first.
    pub daily: Vec<DailyTotals>,
    /// Current low/out-of-stock items; not filtered by the range.
    pub low_stock: Vec<LowStockLine>,
}

pub fn dashboard_summary(state: &ShopState, range: &DateRange) -> DashboardSummary {
    let sales: Vec<_> = state
        .sales()
        .records()
        .iter()
        .filter(|s| range.contains(s.date))
        .collect();
    let expenses: Vec<_> = state
        .expenses()
        .records()
        .iter()
        .filter(|e| range.contains(e.date))
        .collect();

    let total_sales: Money = sales.iter().map(|s| s.amount).sum();
    let total_expenses: Money = expenses.iter().map(|e| e.amount).sum();

    let by_variation = SaleVariation::ALL
        .into_iter()
        .map(|variation| {
            let matching = sales.iter().filter(|s| s.variation == variation);
            VariationTotal {
                variation,
                name: variation.display_name(),
                quantity: matching.clone().map(|s| u64::from(s.quantity)).sum(),
                amount: matching.map(|s| s.amount).sum(),
            }
        })
        .collect();

    let mut daily: BTreeMap<NaiveDate, DailyTotals> = BTreeMap::new();
    for s in &sales {
        let day = s.date.date_naive();
        daily.entry(day).or_insert_with(|| empty_day(day)).sales += s.amount;
    }
    for e in &expenses {
        let day = e.date.date_naive();
        daily.entry(day).or_insert_with(|| empty_day(day)).expenses += e.amount;
    }

    let low_stock = state
        .ledger()
        .stock()
        .low_stock_items()
        .into_iter()
        .map(|i| LowStockLine {
            id: i.id,
            name: i.name.clone(),
            quantity: i.quantity,
            unit: i.unit,
            status: status_of(i.quantity, i.unit),
            tier: tier_of(i.quantity, i.unit),
        })
        .collect();

    DashboardSummary {
        total_sales,
        total_expenses,
        net_profit: total_sales - total_expenses,
        sales_count: sales.len(),
        items_sold: sales.iter().map(|s| u64::from(s.quantity)).sum(),
        by_variation,
        daily: daily.into_values().collect(),
        low_stock,
    }
}

fn empty_day(day: NaiveDate) -> DailyTotals {
    DailyTotals {
        day,
        sales: 0,
        expenses: 0,
    }
}
