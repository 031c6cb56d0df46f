//! Bearer-token guard for the `/business` routes.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use service::auth::TokenClaims;
use tracing::debug;

use crate::{errors::ApiError, state::AppState};

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Verify the bearer token and stash its claims in the request extensions.
pub async fn require_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;
    let claims = state
        .verifier
        .verify(token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;
    debug!(username = %claims.username, kind = %claims.kind, "token accepted");
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub fn require_owner(claims: &TokenClaims) -> Result<(), ApiError> {
    if claims.is_owner() { Ok(()) } else { Err(ApiError::Forbidden) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(v: &'static str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_static(v));
        h
    }

    #[test]
    fn parses_bearer_scheme() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("bearer xyz")), Some("xyz"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn owner_gate() {
        assert!(require_owner(&TokenClaims::new("a", "owner")).is_ok());
        assert!(matches!(require_owner(&TokenClaims::new("a", "buyer")), Err(ApiError::Forbidden)));
    }
}
