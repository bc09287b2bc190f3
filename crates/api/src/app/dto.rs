use serde::{Deserialize, Serialize};

use stallbook_accounting::Expense;
use stallbook_core::Money;
use stallbook_inventory::{
    status_of, tier_of, InventoryItem, InventoryTransaction, StockStatus, StockTier, Unit,
};
use stallbook_infra::PurchaseReceipt;
use stallbook_sales::SaleVariation;

/// An item as listed on the dashboard, with its stock badge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemView {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub status: StockStatus,
    pub tier: StockTier,
}

impl From<InventoryItem> for InventoryItemView {
    fn from(item: InventoryItem) -> Self {
        Self {
            status: status_of(item.quantity, item.unit),
            tier: tier_of(item.quantity, item.unit),
            item,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockQuery {
    pub name: String,
    pub unit: Unit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsageRequest {
    pub quantity: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub transaction: InventoryTransaction,
    pub item: InventoryItemView,
    pub item_created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense: Option<Expense>,
}

impl From<PurchaseReceipt> for PurchaseResponse {
    fn from(receipt: PurchaseReceipt) -> Self {
        Self {
            transaction: receipt.transaction,
            item: receipt.item.into(),
            item_created: receipt.item_created,
            expense: receipt.expense,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UsageResponse {
    pub transaction: InventoryTransaction,
    pub item: InventoryItemView,
}

/// A menu entry for the sale form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationView {
    pub id: SaleVariation,
    pub name: &'static str,
    pub default_price: Money,
}

impl From<SaleVariation> for VariationView {
    fn from(variation: SaleVariation) -> Self {
        Self {
            id: variation,
            name: variation.display_name(),
            default_price: variation.default_price(),
        }
    }
}

/// Suggestion request; `salesData` is filled from recorded sales when omitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    #[serde(default)]
    pub sales_data: Option<String>,
    pub season: String,
    pub menu: String,
}
