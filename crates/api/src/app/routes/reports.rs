use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use stallbook_infra::reports::DateRange;
use stallbook_infra::Collection;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/summary", get(summary))
        .route("/compiled.csv", get(compiled_csv))
        .route("/export/:collection", get(collection_csv))
}

pub async fn summary(
    Extension(services): Extension<Arc<AppServices>>,
    Query(range): Query<DateRange>,
) -> Response {
    Json(services.shop().summary(&range)).into_response()
}

pub async fn compiled_csv(
    Extension(services): Extension<Arc<AppServices>>,
    Query(range): Query<DateRange>,
) -> Response {
    match services.shop().compiled_report_csv(&range) {
        Ok(csv) => csv_response("compiled_report.csv", csv),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn collection_csv(
    Extension(services): Extension<Arc<AppServices>>,
    Path(collection): Path<String>,
) -> Response {
    let name = collection.trim_end_matches(".csv");
    let collection = match name {
        "sales" => Collection::Sales,
        "expenses" => Collection::Expenses,
        "inventory" => Collection::Inventory,
        "transactions" => Collection::Transactions,
        _ => {
            return errors::json_error(
                StatusCode::NOT_FOUND,
                "not_found",
                format!("unknown collection '{name}'; expected sales, expenses, inventory or transactions"),
            )
        }
    };

    match services.shop().collection_csv(collection) {
        Ok(csv) => csv_response(&format!("{name}.csv"), csv),
        Err(e) => errors::service_error_to_response(e),
    }
}

fn csv_response(filename: &str, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}
