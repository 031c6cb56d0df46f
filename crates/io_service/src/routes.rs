use axum::{
    routing::{get, post},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::errors::ApiError;

pub mod categories;
pub mod houses;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Ids arrive as raw path segments; anything that is not a number cannot name
/// a row.
pub(crate) fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::NotFound(format!("no record with id {raw}")))
}

/// Build the io-service router over an open database connection.
pub fn build_router(db: DatabaseConnection) -> Router {
    let io = Router::new()
        .route("/io/category", post(categories::create_category))
        .route("/io/categories", get(categories::list_categories))
        .route("/io/houses", get(houses::list_houses).post(houses::create_house))
        .route(
            "/io/house/:id",
            get(houses::get_house).put(houses::update_house).delete(houses::delete_house),
        );

    Router::new()
        .route("/health", get(health))
        .merge(io)
        .with_state(db)
        .layer(CorsLayer::very_permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
