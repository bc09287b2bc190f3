use axum::{routing::get, Router};

pub mod expenses;
pub mod inventory;
pub mod reports;
pub mod sales;
pub mod suggestions;
pub mod system;

/// Router for every dashboard endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/stream", get(system::stream))
        .nest("/inventory", inventory::router())
        .nest("/sales", sales::router())
        .nest("/expenses", expenses::router())
        .nest("/reports", reports::router())
        .nest("/suggestions", suggestions::router())
}
