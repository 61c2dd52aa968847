use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use ridereel_types::NewEvent;

use crate::error::{ApiError, ValidJson};
use crate::state::{AppState, with_store};

pub async fn list_events(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let events = with_store(&state, |s| s.list_events()).await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let event = with_store(&state, move |s| s.get_event(id))
        .await?
        .ok_or(ApiError::NotFound("Event not found"))?;
    Ok(Json(event))
}

pub async fn create_event(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<NewEvent>,
) -> Result<impl IntoResponse, ApiError> {
    let event = with_store(&state, move |s| s.create_event(&req)).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = with_store(&state, move |s| s.delete_event(id)).await?;
    if !deleted {
        return Err(ApiError::NotFound("Event not found"));
    }
    Ok(Json(json!({ "message": "Event deleted successfully" })))
}
