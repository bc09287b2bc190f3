use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde_json::json;

use stallbook_core::SaleId;
use stallbook_sales::{NewSale, SaleValues, SaleVariation};

use crate::app::services::{AppServices, SALES_UPDATED};
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_sales).post(record_sale))
        .route("/variations", get(list_variations))
        .route("/:id", put(edit_sale))
}

pub async fn list_sales(Extension(services): Extension<Arc<AppServices>>) -> Response {
    Json(services.shop().sales()).into_response()
}

pub async fn list_variations() -> Json<Vec<dto::VariationView>> {
    Json(SaleVariation::ALL.into_iter().map(Into::into).collect())
}

pub async fn record_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewSale>,
) -> Response {
    match services.shop().record_sale(body) {
        Ok(sale) => {
            services.notify(SALES_UPDATED, json!({ "saleId": sale.id }));
            (StatusCode::CREATED, Json(sale)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn edit_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<SaleValues>,
) -> Response {
    let sale_id: SaleId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.shop().edit_sale(sale_id, body) {
        Ok(sale) => {
            services.notify(SALES_UPDATED, json!({ "saleId": sale.id }));
            Json(sale).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}
