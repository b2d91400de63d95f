use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::{
    ContentItem, EngagementEvent, EngagementKind, FeedMode, InterestProfile, SessionSnapshot,
};
use crate::services::{FeedSession, WrappedSummary};

use super::state::SessionEntry;
use super::AppState;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: Uuid,
    pub mode: FeedMode,
    pub max_videos: usize,
    pub items: Vec<ContentItem>,
}

#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: Uuid,
    pub mode: FeedMode,
    pub shown: usize,
    pub max_videos: usize,
    pub finished: bool,
    pub focused: Option<u32>,
    pub cursor: usize,
    /// Item whose dwell timer has not fired yet
    pub pending_dwell: Option<u32>,
    pub started_at: DateTime<Utc>,
    pub profile: InterestProfile,
}

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct NextResponse {
    pub items: Vec<ContentItem>,
    pub mode: FeedMode,
    pub finished: bool,
}

#[derive(Debug, Serialize)]
pub struct EngagementResponse {
    pub item_id: u32,
    pub kind: EngagementKind,
    pub weight: f64,
    pub profile: InterestProfile,
}

#[derive(Debug, Deserialize)]
pub struct FocusRequest {
    pub item_id: u32,
}

#[derive(Debug, Serialize)]
pub struct FocusResponse {
    pub item_id: u32,
    pub dwell_threshold_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct BlurResponse {
    pub blurred: Option<u32>,
    pub cancelled_timer: Option<u32>,
}

fn session_not_found(session_id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {} not found", session_id))
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Get the content catalog
pub async fn get_catalog(State(state): State<AppState>) -> Json<Vec<ContentItem>> {
    Json(state.catalog.items().to_vec())
}

/// Start a new feed session with its seed items
pub async fn create_session(
    State(state): State<AppState>,
    request_id: RequestId,
) -> (StatusCode, Json<SessionCreatedResponse>) {
    let mut session = FeedSession::new(state.catalog.clone(), &state.settings);
    let items = session.start();
    let session_id = Uuid::new_v4();

    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        seeded = items.len(),
        "Session started"
    );

    let response = SessionCreatedResponse {
        session_id,
        mode: session.mode(),
        max_videos: state.settings.max_videos,
        items,
    };

    let mut sessions = state.sessions.write().await;
    sessions.insert(session_id, SessionEntry::new(session));

    (StatusCode::CREATED, Json(response))
}

/// Get session status and current profile
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionStatusResponse>> {
    let sessions = state.sessions.read().await;
    let entry = sessions
        .get(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    let session = &entry.session;

    Ok(Json(SessionStatusResponse {
        session_id,
        mode: session.mode(),
        shown: session.history().len(),
        max_videos: session.state().max_videos,
        finished: session.is_finished(),
        focused: session.focused(),
        cursor: session.state().cursor(),
        pending_dwell: entry.timers.armed_item(),
        started_at: session.started_at(),
        profile: session.profile().clone(),
    }))
}

/// Select the next items for the feed window
pub async fn next_items(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<NextQuery>,
) -> AppResult<Json<NextResponse>> {
    let count = query.count.unwrap_or(1);
    if count == 0 {
        return Err(AppError::InvalidInput("count must be at least 1".to_string()));
    }

    let mut sessions = state.sessions.write().await;
    let entry = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    entry.touch();

    let items = entry.session.fill_window(count);

    Ok(Json(NextResponse {
        items,
        mode: entry.session.mode(),
        finished: entry.session.is_finished(),
    }))
}

/// Record a like, comment, share or view signal
pub async fn record_engagement(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    request_id: RequestId,
    Json(event): Json<EngagementEvent>,
) -> AppResult<Json<EngagementResponse>> {
    let mut sessions = state.sessions.write().await;
    let entry = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    entry.touch();

    let weight = entry.session.apply(&event)?;

    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        item_id = event.item_id,
        kind = %event.kind,
        weight,
        "Engagement applied"
    );

    Ok(Json(EngagementResponse {
        item_id: event.item_id,
        kind: event.kind,
        weight,
        profile: entry.session.profile().clone(),
    }))
}

/// Focus an item and arm its dwell timer, cancelling any previous one
pub async fn focus_item(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<FocusRequest>,
) -> AppResult<Json<FocusResponse>> {
    let mut sessions = state.sessions.write().await;
    let entry = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    entry.touch();

    entry.session.focus(request.item_id)?;

    let item_id = request.item_id;
    let delay = state.settings.dwell_threshold;
    let registry = state.sessions.clone();
    entry.timers.arm(item_id, delay, async move {
        let mut sessions = registry.write().await;
        if let Some(entry) = sessions.get_mut(&session_id) {
            if entry.session.record_dwell(item_id) {
                tracing::info!(session_id = %session_id, item_id, "Long view credited");
            }
        }
    });

    Ok(Json(FocusResponse {
        item_id,
        dwell_threshold_ms: delay.as_millis() as u64,
    }))
}

/// Clear focus and cancel the pending dwell timer
pub async fn blur_item(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<BlurResponse>> {
    let mut sessions = state.sessions.write().await;
    let entry = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    entry.touch();

    Ok(Json(BlurResponse {
        blurred: entry.session.blur(),
        cancelled_timer: entry.timers.clear(),
    }))
}

/// Get the hand-off record for a session
pub async fn get_snapshot(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionSnapshot>> {
    let sessions = state.sessions.read().await;
    let entry = sessions
        .get(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    Ok(Json(entry.session.snapshot()))
}

/// Summarize a live session
pub async fn get_wrapped(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<WrappedSummary>> {
    let sessions = state.sessions.read().await;
    let entry = sessions
        .get(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    Ok(Json(WrappedSummary::from_snapshot(&entry.session.snapshot())))
}

/// Summarize a posted hand-off record; unreadable bodies get the placeholder
pub async fn summarize(body: String) -> Json<WrappedSummary> {
    let raw = Some(body.as_str()).filter(|b| !b.trim().is_empty());
    Json(WrappedSummary::from_json(raw))
}

/// End a session, returning its final hand-off record
pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionSnapshot>> {
    let entry = state
        .sessions
        .write()
        .await
        .remove(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    tracing::info!(
        session_id = %session_id,
        shown = entry.session.history().len(),
        profile_total = entry.session.profile().total(),
        "Session ended"
    );

    Ok(Json(entry.session.snapshot()))
}
