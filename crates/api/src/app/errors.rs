use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use stallbook_ai::SuggestError;
use stallbook_core::DomainError;
use stallbook_infra::reports::ReportError;
use stallbook_infra::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> Response {
    match err {
        ServiceError::Domain(e) => domain_error_to_response(e),
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "store error");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
        ServiceError::Report(ReportError::NoData) => {
            json_error(StatusCode::NOT_FOUND, "no_data", "no data to export")
        }
        ServiceError::Report(e) => {
            tracing::error!(error = %e, "report error");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "report_error", e.to_string())
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    let message = err.to_string();
    match err {
        DomainError::Validation(_) => json_error(StatusCode::BAD_REQUEST, "validation_error", message),
        DomainError::InvalidId(_) => json_error(StatusCode::BAD_REQUEST, "invalid_id", message),
        DomainError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", message),
        DomainError::InvariantViolation(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", message)
        }
        DomainError::InsufficientStock {
            name,
            requested,
            available,
            unit,
        } => (
            StatusCode::CONFLICT,
            axum::Json(json!({
                "error": "insufficient_stock",
                "message": message,
                "name": name,
                "requested": requested,
                "available": available,
                "unit": unit,
            })),
        )
            .into_response(),
    }
}

pub fn suggest_error_to_response(err: SuggestError) -> Response {
    match err {
        SuggestError::InvalidInput(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        e @ (SuggestError::Llm(_) | SuggestError::Malformed(_)) => {
            tracing::warn!(error = %e, "suggestion request failed");
            json_error(StatusCode::BAD_GATEWAY, "model_error", e.to_string())
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Parse a path id, answering 400 on failure.
pub fn parse_id<T>(raw: &str) -> Result<T, Response>
where
    T: core::str::FromStr<Err = DomainError>,
{
    raw.parse().map_err(domain_error_to_response)
}
