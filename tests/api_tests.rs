use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use bubble_feed::api::{create_router, AppState};
use bubble_feed::models::{Catalog, ContentItem};
use bubble_feed::services::FeedSettings;

fn dogs_catalog() -> Catalog {
    Catalog::new(vec![
        ContentItem::new(1, "r1", "Funny Cat", "@a", &["funny", "cats"]),
        ContentItem::new(2, "r2", "Area 51", "@b", &["conspiracy"]),
        ContentItem::new(3, "r3", "Stretching", "@c", &["health"]),
        ContentItem::new(4, "r4", "Gadgets", "@d", &["tech"]),
        ContentItem::new(5, "r5", "Beats", "@e", &["music"]),
        ContentItem::new(6, "r6", "Good Boy", "@h", &["dogs", "pets"]),
        ContentItem::new(7, "r7", "Travel", "@f", &["travel"]),
        ContentItem::new(8, "r8", "Cooking", "@g", &["food"]),
        ContentItem::new(9, "r9", "Husky Drama", "@h", &["dogs", "funny"]),
        ContentItem::new(10, "r10", "Puppy School", "@h", &["dogs"]),
    ])
    .unwrap()
}

fn create_test_server_with(settings: FeedSettings) -> TestServer {
    let state = AppState::new(Arc::new(dogs_catalog()), settings);
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn create_test_server() -> TestServer {
    create_test_server_with(FeedSettings {
        rng_seed: Some(7),
        ..Default::default()
    })
}

async fn start_session(server: &TestServer) -> (String, Vec<Value>) {
    let response = server.post("/sessions").await;
    response.assert_status(StatusCode::CREATED);
    let created: Value = response.json();
    let id = created["session_id"].as_str().unwrap().to_string();
    let items = created["items"].as_array().unwrap().clone();
    (id, items)
}

fn ids(items: &[Value]) -> Vec<u64> {
    items.iter().map(|i| i["id"].as_u64().unwrap()).collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_echoed() {
    let server = create_test_server();
    let response = server.get("/health").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_get_catalog() {
    let server = create_test_server();
    let response = server.get("/catalog").await;
    response.assert_status_ok();
    let items: Vec<Value> = response.json();
    assert_eq!(items.len(), 10);
    assert_eq!(items[0]["mediaRef"], "r1");
}

#[tokio::test]
async fn test_create_session_seeds_diverse_items() {
    let server = create_test_server();
    let (_, items) = start_session(&server).await;
    assert_eq!(ids(&items), vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let server = create_test_server();
    let response = server
        .get("/sessions/00000000-0000-0000-0000-000000000000")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_runs_to_max_without_repeats() {
    let server = create_test_server();
    let (id, seeds) = start_session(&server).await;

    let response = server
        .post(&format!("/sessions/{}/next", id))
        .add_query_param("count", 20)
        .await;
    response.assert_status_ok();
    let next: Value = response.json();
    let more = next["items"].as_array().unwrap();
    assert_eq!(more.len(), 5);
    assert_eq!(next["finished"], true);

    let mut all = ids(&seeds);
    all.extend(ids(more));
    let unique: HashSet<u64> = all.iter().copied().collect();
    assert_eq!(unique.len(), 10);

    let response = server.post(&format!("/sessions/{}/next", id)).await;
    let next: Value = response.json();
    assert!(next["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_next_with_huge_count_stops_at_max() {
    let server = create_test_server();
    let (id, _) = start_session(&server).await;

    let response = server
        .post(&format!("/sessions/{}/next", id))
        .add_query_param("count", usize::MAX)
        .await;
    response.assert_status_ok();
    let next: Value = response.json();
    assert_eq!(next["items"].as_array().unwrap().len(), 5);
    assert_eq!(next["finished"], true);

    // the server is still serving
    server.get("/health").await.assert_status_ok();
}

#[tokio::test]
async fn test_engagement_updates_profile() {
    let server = create_test_server();
    let (id, _) = start_session(&server).await;

    let response = server
        .post(&format!("/sessions/{}/engagements", id))
        .json(&json!({ "item_id": 6, "kind": "like" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["weight"], 3.0);
    assert_eq!(body["profile"]["dogs"], 3.0);
    assert_eq!(body["profile"]["pets"], 3.0);

    // Unknown kinds fall back to weight 1
    let response = server
        .post(&format!("/sessions/{}/engagements", id))
        .json(&json!({ "item_id": 6, "kind": "bookmark" }))
        .await;
    let body: Value = response.json();
    assert_eq!(body["weight"], 1.0);
    assert_eq!(body["profile"]["dogs"], 4.0);
}

#[tokio::test]
async fn test_engagement_with_unknown_item() {
    let server = create_test_server();
    let (id, _) = start_session(&server).await;

    let response = server
        .post(&format!("/sessions/{}/engagements", id))
        .json(&json!({ "item_id": 999, "kind": "like" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dogs_scenario_personalizes() {
    let server = create_test_server();
    let (id, _) = start_session(&server).await;

    // sixth item, no engagement yet
    let response = server.post(&format!("/sessions/{}/next", id)).await;
    let next: Value = response.json();
    assert_eq!(next["mode"], "profiling");

    for kind in ["completed_view", "like"] {
        server
            .post(&format!("/sessions/{}/engagements", id))
            .json(&json!({ "item_id": 10, "kind": kind }))
            .await
            .assert_status_ok();
    }

    let status: Value = server.get(&format!("/sessions/{}", id)).await.json();
    assert_eq!(status["profile"]["dogs"], 10.0);
    let shown_before = status["shown"].as_u64().unwrap();
    assert_eq!(shown_before, 6);

    let snapshot: Value = server.get(&format!("/sessions/{}/snapshot", id)).await.json();
    let seen: HashSet<u64> = ids(snapshot["feedHistory"].as_array().unwrap()).into_iter().collect();

    let next: Value = server.post(&format!("/sessions/{}/next", id)).await.json();
    assert_eq!(next["mode"], "personalizing");
    let picked = next["items"][0]["id"].as_u64().unwrap();
    assert!(!seen.contains(&picked));
}

#[tokio::test]
async fn test_focus_requires_shown_item() {
    let server = create_test_server();
    let (id, _) = start_session(&server).await;

    let response = server
        .post(&format!("/sessions/{}/focus", id))
        .json(&json!({ "item_id": 10 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dwell_credits_focused_item() {
    let server = create_test_server_with(FeedSettings {
        rng_seed: Some(7),
        dwell_threshold: Duration::from_millis(50),
        ..Default::default()
    });
    let (id, _) = start_session(&server).await;

    server
        .post(&format!("/sessions/{}/focus", id))
        .json(&json!({ "item_id": 2 }))
        .await
        .assert_status_ok();

    tokio::time::sleep(Duration::from_millis(300)).await;

    let status: Value = server.get(&format!("/sessions/{}", id)).await.json();
    assert_eq!(status["profile"]["conspiracy"], 1.0);
    assert!(status["pending_dwell"].is_null());
}

#[tokio::test]
async fn test_blur_cancels_dwell_timer() {
    let server = create_test_server_with(FeedSettings {
        rng_seed: Some(7),
        dwell_threshold: Duration::from_millis(200),
        ..Default::default()
    });
    let (id, _) = start_session(&server).await;

    server
        .post(&format!("/sessions/{}/focus", id))
        .json(&json!({ "item_id": 1 }))
        .await
        .assert_status_ok();

    let status: Value = server.get(&format!("/sessions/{}", id)).await.json();
    assert_eq!(status["pending_dwell"], 1);

    let response = server.delete(&format!("/sessions/{}/focus", id)).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["blurred"], 1);
    assert_eq!(body["cancelled_timer"], 1);

    tokio::time::sleep(Duration::from_millis(400)).await;

    let status: Value = server.get(&format!("/sessions/{}", id)).await.json();
    assert!(status["profile"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_wrapped_for_session() {
    let server = create_test_server();
    let (id, _) = start_session(&server).await;

    server
        .post(&format!("/sessions/{}/engagements", id))
        .json(&json!({ "item_id": 2, "kind": "completed_view" }))
        .await
        .assert_status_ok();

    let summary: Value = server.get(&format!("/sessions/{}/wrapped", id)).await.json();
    assert_eq!(summary["top_tags"][0]["tag"], "conspiracy");
    assert_eq!(summary["dominant_bias"], "Rabbit Hole");
    assert_eq!(summary["placeholder"], false);
    assert_eq!(summary["videos_watched"], 5);
}

#[tokio::test]
async fn test_wrapped_degrades_on_corrupt_handoff() {
    let server = create_test_server();
    let response = server.post("/wrapped").text("not a snapshot").await;
    response.assert_status_ok();
    let summary: Value = response.json();
    assert_eq!(summary["placeholder"], true);
    assert_eq!(summary["top_tags"][0]["tag"], "funny");
}

#[tokio::test]
async fn test_end_session_hands_off_snapshot() {
    let server = create_test_server();
    let (id, _) = start_session(&server).await;

    let response = server.delete(&format!("/sessions/{}", id)).await;
    response.assert_status_ok();
    let snapshot: Value = response.json();
    assert_eq!(snapshot["feedHistory"].as_array().unwrap().len(), 5);
    assert!(snapshot["engagement"].is_object());

    let summary: Value = server
        .post("/wrapped")
        .json(&snapshot)
        .await
        .json();
    assert_eq!(summary["placeholder"], false);
    assert_eq!(summary["snapshots"].as_array().unwrap().len(), 2);

    server
        .get(&format!("/sessions/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
