use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use stallbook_ai::SuggestionInput;
use stallbook_infra::reports::ReportError;
use stallbook_infra::{Collection, ServiceError};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", post(suggest))
}

pub async fn suggest(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::SuggestionRequest>,
) -> Response {
    let Some(suggester) = services.suggester() else {
        return errors::json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "suggestions_disabled",
            "ingredient suggestions need GEMINI_API_KEY to be configured",
        );
    };

    let sales_data = match body.sales_data {
        Some(data) => data,
        None => match services.shop().collection_csv(Collection::Sales) {
            Ok(csv) => csv,
            Err(ServiceError::Report(ReportError::NoData)) => String::new(),
            Err(e) => return errors::service_error_to_response(e),
        },
    };

    let input = SuggestionInput {
        sales_data,
        season: body.season,
        menu: body.menu,
    };

    match suggester.suggest(&input).await {
        Ok(suggestions) => Json(suggestions).into_response(),
        Err(e) => errors::suggest_error_to_response(e),
    }
}
