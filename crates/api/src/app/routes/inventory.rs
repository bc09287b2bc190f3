use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use stallbook_core::{DomainError, ItemId, TransactionId};
use stallbook_inventory::{status_of, InventoryTransaction, PurchaseInput, TransactionValues};

use crate::app::{dto, errors};
use crate::app::services::{AppServices, EXPENSES_UPDATED, INVENTORY_UPDATED};

pub fn router() -> Router {
    Router::new()
        .route("/items", get(list_items))
        .route("/items/:id", get(get_item))
        .route("/items/:id/usage", post(record_usage))
        .route("/purchases", post(record_purchase))
        .route("/transactions", get(list_transactions))
        .route("/transactions/:id", get(get_transaction).put(edit_transaction))
        .route("/transactions/:id/revisions/:revision", get(get_transaction_revision))
        .route("/stock", get(current_stock))
        .route("/low-stock", get(low_stock))
        .route("/reconciliation", get(reconciliation))
}

pub async fn list_items(Extension(services): Extension<Arc<AppServices>>) -> Response {
    let items: Vec<dto::InventoryItemView> = services
        .shop()
        .inventory()
        .into_iter()
        .map(Into::into)
        .collect();
    Json(items).into_response()
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let item_id: ItemId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.shop().read(|s| s.ledger().item(&item_id).cloned()) {
        Some(item) => Json(dto::InventoryItemView::from(item)).into_response(),
        None => errors::domain_error_to_response(DomainError::not_found(format!(
            "inventory item {item_id}"
        ))),
    }
}

pub async fn record_purchase(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<PurchaseInput>,
) -> Response {
    let receipt = match services.shop().record_purchase(body) {
        Ok(r) => r,
        Err(e) => return errors::service_error_to_response(e),
    };

    services.notify(INVENTORY_UPDATED, json!({ "itemId": receipt.item.id }));
    if let Some(expense) = &receipt.expense {
        services.notify(EXPENSES_UPDATED, json!({ "expenseId": expense.id }));
    }

    (StatusCode::CREATED, Json(dto::PurchaseResponse::from(receipt))).into_response()
}

pub async fn record_usage(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UsageRequest>,
) -> Response {
    let item_id: ItemId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let outcome = match services.shop().record_usage(item_id, body.quantity) {
        Ok(o) => o,
        Err(e) => return errors::service_error_to_response(e),
    };

    services.notify(INVENTORY_UPDATED, json!({ "itemId": outcome.item.id }));

    (
        StatusCode::CREATED,
        Json(dto::UsageResponse {
            transaction: outcome.transaction,
            item: outcome.item.into(),
        }),
    )
        .into_response()
}

pub async fn list_transactions(Extension(services): Extension<Arc<AppServices>>) -> Response {
    Json(services.shop().transactions()).into_response()
}

fn find_transaction(services: &AppServices, id: &str) -> Result<InventoryTransaction, Response> {
    let tx_id: TransactionId = errors::parse_id(id)?;
    services
        .shop()
        .read(|s| s.ledger().transaction(&tx_id).cloned())
        .ok_or_else(|| {
            errors::domain_error_to_response(DomainError::not_found(format!("transaction {tx_id}")))
        })
}

pub async fn get_transaction(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    match find_transaction(&services, &id) {
        Ok(tx) => Json(tx).into_response(),
        Err(resp) => resp,
    }
}

/// Field values of a transaction as they stood at `revision` (0 = as recorded).
pub async fn get_transaction_revision(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, revision)): Path<(String, usize)>,
) -> Response {
    let tx = match find_transaction(&services, &id) {
        Ok(tx) => tx,
        Err(resp) => return resp,
    };

    match tx.values_at_revision(revision) {
        Some(values) => Json(json!({
            "id": tx.id,
            "revision": revision,
            "latest": tx.revision(),
            "values": values,
        }))
        .into_response(),
        None => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("transaction {} has no revision {revision}", tx.id),
        ),
    }
}

pub async fn edit_transaction(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<TransactionValues>,
) -> Response {
    let tx_id: TransactionId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.shop().edit_transaction(tx_id, body) {
        Ok(tx) => {
            services.notify(INVENTORY_UPDATED, json!({ "transactionId": tx.id }));
            Json(tx).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Quantity on hand for a name and unit; 0 when nothing matches.
pub async fn current_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::StockQuery>,
) -> Response {
    let quantity = services
        .shop()
        .read(|s| s.ledger().stock().current_quantity(&query.name, query.unit));

    Json(json!({
        "name": query.name.trim(),
        "unit": query.unit,
        "quantity": quantity.unwrap_or(0.0),
        "known": quantity.is_some(),
        "status": status_of(quantity.unwrap_or(0.0), query.unit),
    }))
    .into_response()
}

pub async fn low_stock(Extension(services): Extension<Arc<AppServices>>) -> Response {
    let items: Vec<dto::InventoryItemView> = services.shop().read(|s| {
        s.ledger()
            .stock()
            .low_stock_items()
            .into_iter()
            .cloned()
            .map(Into::into)
            .collect()
    });
    Json(items).into_response()
}

pub async fn reconciliation(Extension(services): Extension<Arc<AppServices>>) -> Response {
    Json(services.shop().reconciliation()).into_response()
}
