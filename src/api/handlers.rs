use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::EnrichedResult;
use crate::services::{SessionPhase, SessionState};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct DetailRequest {
    /// 0-based position in the current result list
    pub rank: usize,
}

#[derive(Debug, Serialize)]
pub struct TitlesResponse {
    pub titles: Vec<String>,
    /// True when the precomputed data could not be loaded
    pub demo_data: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub phase: SessionPhase,
    pub query: Option<String>,
    pub results: Option<Vec<EnrichedResult>>,
    pub expanded: Option<EnrichedResult>,
    pub updated_at: DateTime<Utc>,
}

impl SessionResponse {
    fn new(id: Uuid, state: &SessionState) -> Self {
        Self {
            id,
            phase: state.phase(),
            query: state.query().map(str::to_string),
            results: state.results().map(<[_]>::to_vec),
            expanded: state.expanded().cloned(),
            updated_at: state.updated_at(),
        }
    }
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {} not found", id))
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// List catalog titles in catalog order
pub async fn get_titles(State(state): State<AppState>) -> Json<TitlesResponse> {
    let data = state.data();
    Json(TitlesResponse {
        titles: data.catalog.titles().map(str::to_string).collect(),
        demo_data: data.is_demo(),
    })
}

/// Start a new, empty session
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    let id = Uuid::new_v4();
    let session = SessionState::new();
    let response = SessionResponse::new(id, &session);

    state.sessions.insert(id, session).await;
    tracing::info!(session_id = %id, "Session created");

    (StatusCode::CREATED, Json(response))
}

/// Get the current state of a session
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    let response = state
        .sessions
        .with_session(id, |session| SessionResponse::new(id, session))
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(response))
}

/// End a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .sessions
        .remove(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Submit a query title: rank, enrich, and replace the session's results
///
/// If another query is accepted for the same session while this one is being
/// resolved, this one's results are discarded and the newer state is returned.
pub async fn submit_query(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<QueryRequest>,
) -> AppResult<Json<SessionResponse>> {
    let generation = state
        .sessions
        .with_session(id, SessionState::begin_query)
        .await
        .ok_or_else(|| session_not_found(id))?;

    tracing::info!(session_id = %id, query = %request.title, generation, "Processing query");

    // Resolve without holding the session map lock; metadata lookups may take seconds
    let results = state.controller.resolve(&request.title).await;

    let response = state
        .sessions
        .with_session(id, |session| {
            if !session.complete_query(generation, request.title, results) {
                tracing::debug!(session_id = %id, generation, "Discarding results of superseded query");
            }
            SessionResponse::new(id, session)
        })
        .await
        .ok_or_else(|| session_not_found(id))?;

    Ok(Json(response))
}

/// Expand one result
pub async fn show_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DetailRequest>,
) -> AppResult<Json<SessionResponse>> {
    let response = state
        .sessions
        .with_session(id, |session| -> AppResult<SessionResponse> {
            session.show_detail(request.rank)?;
            Ok(SessionResponse::new(id, session))
        })
        .await
        .ok_or_else(|| session_not_found(id))??;
    Ok(Json(response))
}

/// Close the detail view
pub async fn close_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    let response = state
        .sessions
        .with_session(id, |session| {
            session.close_detail();
            SessionResponse::new(id, session)
        })
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(response))
}
