//! Integration Tests for Admin API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use operator_cache::{
    api::create_router, cache::keys, models::ListingPage, source::InMemoryOperatorSource,
    AppState, Config,
};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_state() -> AppState {
    let source = Arc::new(InMemoryOperatorSource::with_sample_data(25));
    AppState::from_config(source, &Config::default())
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == Health ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_router(create_test_state());

    let (status, json) = send(app, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

// == Stats ==

#[tokio::test]
async fn test_stats_endpoint_initial() {
    let app = create_router(create_test_state());

    let (status, json) = send(app, "GET", "/stats").await;

    assert_eq!(status, StatusCode::OK);
    for field in ["hits", "misses", "sets", "invalidations", "evictions", "size"] {
        assert_eq!(json[field], 0, "{} should start at zero", field);
    }
    assert_eq!(json["hit_rate"], 0.0);
    assert!(json["last_cleanup"].is_null());
    assert!(json["last_preload"].is_null());
}

#[tokio::test]
async fn test_stats_reflect_directory_traffic() {
    let state = create_test_state();
    let directory = state.directory.clone();

    directory.get_operator("1").await.unwrap();
    directory.get_operator("1").await.unwrap();
    directory.list_operators(1, 20, None).await.unwrap();

    let (_, json) = send(create_router(state), "GET", "/stats").await;

    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["sets"], 2);
    assert_eq!(json["size"], 2);
}

// == Preload ==

#[tokio::test]
async fn test_preload_endpoint() {
    let state = create_test_state();

    let (status, json) = send(create_router(state.clone()), "POST", "/cache/preload").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["operators"].as_u64().unwrap() > 0);
    assert_eq!(json["failures"], 0);
    assert_eq!(json["cancelled"], false);

    let (_, stats) = send(create_router(state), "GET", "/stats").await;
    assert!(stats["last_preload"].is_string());
}

// == Invalidation ==

#[tokio::test]
async fn test_invalidate_all_endpoint() {
    let state = create_test_state();
    state.directory.preloader().run().await;
    let held = state.directory.cache().len();

    let (status, json) = send(create_router(state.clone()), "DELETE", "/cache").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"].as_u64().unwrap() as usize, held);
    assert!(state.directory.cache().is_empty());
}

#[tokio::test]
async fn test_invalidate_key_endpoint() {
    let state = create_test_state();
    let key = keys::operators_list_key(1, 20, None);
    state
        .directory
        .cache()
        .set(key.clone(), ListingPage::default(), None);

    let uri = format!("/cache/keys/{}", "operators:list:1:20:%7B%7D");
    let (status, json) = send(create_router(state.clone()), "DELETE", &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains(&key));
    assert!(!state.directory.cache().contains_key(&key));

    let (status, json) = send(create_router(state), "DELETE", &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_unknown_route() {
    let app = create_router(create_test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
