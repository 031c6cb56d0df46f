use auth_server::routes::build_router;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use service::auth::{TokenIssuer, TokenVerifier};
use tower::ServiceExt;

fn app() -> Router {
    build_router(TokenIssuer::new("mykey", None))
}

async fn post(app: Router, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/auth/token")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn issues_verifiable_token_with_extra_claims() {
    let body = json!({ "username": "alice", "type": "owner", "phone": "555" }).to_string();
    let (status, res) = post(app(), &body).await;
    assert_eq!(status, StatusCode::CREATED);

    let claims = TokenVerifier::new("mykey").verify(res["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.username, "alice");
    assert!(claims.is_owner());
    assert_eq!(claims.extra["phone"], "555");
}

#[tokio::test]
async fn rejects_incomplete_claims() {
    let (status, _) = post(app(), r#"{"username":"alice"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = post(app(), r#"{"type":"owner","username":""}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = post(app(), "[]").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_is_ok() {
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let res = app().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
