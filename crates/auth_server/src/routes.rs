use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::info;

use common::{
    fields::{self, json_object},
    types::Health,
};
use service::auth::{TokenClaims, TokenIssuer};

use crate::errors::ApiError;

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Sign the posted claims. `username` and `type` are required; every other
/// member is carried into the token as-is.
pub async fn issue_token(
    State(issuer): State<TokenIssuer>,
    body: Bytes,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let mut obj = json_object(&body)?;
    let username = fields::text(&obj, "username")?
        .ok_or_else(|| ApiError::BadRequest("username is required".into()))?;
    let kind = fields::text(&obj, "type")?
        .ok_or_else(|| ApiError::BadRequest("type is required".into()))?;
    obj.remove("username");
    obj.remove("type");

    let claims = TokenClaims { username, kind, extra: obj };
    let token = issuer.issue(&claims)?;
    info!(username = %claims.username, kind = %claims.kind, "token issued");
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

pub fn build_router(issuer: TokenIssuer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/token", post(issue_token))
        .with_state(issuer)
        .layer(TraceLayer::new_for_http())
}
