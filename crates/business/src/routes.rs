use axum::{
    middleware,
    routing::{delete, get, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::{auth, state::AppState};

pub mod houses;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the business-service router. Everything under `/business` needs a
/// valid bearer token.
pub fn build_router(state: AppState) -> Router {
    let business = Router::new()
        .route("/business/houses", get(houses::list_houses).post(houses::create_house))
        .route("/business/houses/personal", get(houses::personal_houses))
        .route("/business/houses/category/:category", get(houses::houses_by_category))
        .route("/business/houses/owner/:owner", get(houses::houses_by_owner))
        .route("/business/houses/search/:keyword", get(houses::search_houses))
        .route("/business/houses/:id", delete(houses::delete_house))
        .route("/business/house/:id", put(houses::update_house))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_token));

    Router::new()
        .route("/health", get(health))
        .merge(business)
        .with_state(state)
        .layer(CorsLayer::very_permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
