use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use stallbook_accounting::{ExpenseCategory, NewExpense};

use crate::app::errors;
use crate::app::services::{AppServices, EXPENSES_UPDATED};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_expenses).post(record_expense))
        .route("/categories", get(list_categories))
}

pub async fn list_expenses(Extension(services): Extension<Arc<AppServices>>) -> Response {
    Json(services.shop().expenses()).into_response()
}

pub async fn list_categories() -> Json<Vec<ExpenseCategory>> {
    Json(ExpenseCategory::ALL.to_vec())
}

pub async fn record_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewExpense>,
) -> Response {
    match services.shop().record_expense(body) {
        Ok(expense) => {
            services.notify(EXPENSES_UPDATED, json!({ "expenseId": expense.id }));
            (StatusCode::CREATED, Json(expense)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}
