//! トークンAPI契約テスト
//!
//! GET /token/:token/capability

use crate::support::{bearer, test_state, TEST_TOKEN};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use watchcat::api::create_router;

async fn get_capability(path_token: &str, authorization: Option<&str>) -> (StatusCode, Value) {
    let app = create_router(test_state());
    let mut builder = Request::builder().uri(format!("/token/{}/capability", path_token));
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn matching_token_lists_all_capabilities() {
    let (status, body) = get_capability(TEST_TOKEN, Some(&bearer(TEST_TOKEN))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "ok": true,
            "capability": ["GET_LOG", "HEARTBEAT", "LIST_SERVICE"]
        })
    );
}

#[tokio::test]
async fn unknown_token_is_not_found() {
    let (status, body) = get_capability("other", Some(&bearer("other"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"ok": false, "error": "No such token"}));
}

#[tokio::test]
async fn header_token_must_match_path_token() {
    let (status, body) = get_capability(TEST_TOKEN, Some(&bearer("other"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"ok": false, "error": "Invalid token access"}));

    let (status, _) = get_capability(TEST_TOKEN, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
