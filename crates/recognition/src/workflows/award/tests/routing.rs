use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::award::memory::{InMemoryAwardRepository, StaticRoleDirectory};
use crate::workflows::award::router::award_router;
use crate::workflows::award::service::AwardService;

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

fn json_request(method: &str, uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn active_period_is_served_and_missing_period_is_404() {
    let (service, _) = build_service(&["a", "b"], &[], &[]);
    let router = award_router(service);
    let response = router
        .oneshot(get_request("/api/v1/award/period"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["id"], json!("2026-q3"));

    let empty = Arc::new(AwardService::new(
        Arc::new(InMemoryAwardRepository::default()),
        Arc::new(StaticRoleDirectory::default()),
    ));
    let response = award_router(empty)
        .oneshot(get_request("/api/v1/award/period"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["error"], json!("no active period"));
}

#[tokio::test]
async fn voting_status_endpoint_reports_the_quorum_gauge() {
    let (service, candidates) = seven_pool();
    reach_quorum(&service, &users(&["p1", "p2"]), &candidates[..5]);

    let response = award_router(service)
        .oneshot(get_request("/api/v1/award/2026-q3/votes/status"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["required_count"], json!(7));
    assert_eq!(body["completed_count"], json!(2));
}

#[tokio::test]
async fn shortlist_endpoint_returns_conflict_before_quorum() {
    let (service, _) = seven_pool();
    let response = award_router(service)
        .oneshot(get_request("/api/v1/award/2026-q3/shortlist"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = read_json(response).await;
    assert_eq!(
        body["error"],
        json!("quorum not met: 0 of 7 voters completed")
    );
}

#[tokio::test]
async fn rating_submission_round_trips_the_completion_state() {
    let (service, _) = build_service(&["a", "b"], &[], &[]);
    let router = award_router(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/award/2026-q3/ratings/a/b",
            json!({ "1": 5, "2": 3 }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["state"], json!("draft"));

    let response = router
        .oneshot(json_request(
            "PUT",
            "/api/v1/award/2026-q3/ratings/a/b",
            json!({ "3": 9 }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn phase_endpoint_honors_the_active_candidate_hint() {
    let (service, _) = build_service(&["a", "b"], &[], &[]);
    let router = award_router(service);

    let response = router
        .clone()
        .oneshot(get_request("/api/v1/award/2026-q3/phase/a"))
        .await
        .expect("response");
    let body = read_json(response).await;
    assert_eq!(body["phase"], json!("shortlist"));

    let response = router
        .oneshot(get_request("/api/v1/award/2026-q3/phase/a?active=b"))
        .await
        .expect("response");
    let body = read_json(response).await;
    assert_eq!(body["phase"], json!("rate"));
}

#[tokio::test]
async fn vote_submission_endpoint_rejects_small_sets() {
    let (service, _) = seven_pool();
    let response = award_router(service)
        .oneshot(json_request(
            "PUT",
            "/api/v1/award/2026-q3/votes/p1",
            json!({ "candidates": ["p1", "p2"] }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
