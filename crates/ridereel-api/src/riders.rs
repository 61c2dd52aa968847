use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use ridereel_types::NewRider;

use crate::error::{ApiError, FieldError, ValidJson};
use crate::state::{AppState, with_store};

#[derive(Debug, Deserialize)]
pub struct RiderQuery {
    #[serde(rename = "eventId")]
    pub event_id: Option<i64>,
}

pub async fn list_riders(
    State(state): State<AppState>,
    Query(query): Query<RiderQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let riders = with_store(&state, move |s| match query.event_id {
        Some(event_id) => s.riders_by_event(event_id),
        None => s.list_riders(),
    })
    .await?;
    Ok(Json(riders))
}

pub async fn get_rider(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let rider = with_store(&state, move |s| s.get_rider(id))
        .await?
        .ok_or(ApiError::NotFound("Rider not found"))?;
    Ok(Json(rider))
}

pub async fn create_rider(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<NewRider>,
) -> Result<impl IntoResponse, ApiError> {
    // Orphaned riders must not exist: the referenced event is checked
    // before the insert, inside the same store call.
    let rider = with_store(&state, move |s| {
        if s.get_event(req.event_id)?.is_none() {
            return Ok(None);
        }
        s.create_rider(&req).map(Some)
    })
    .await?
    .ok_or_else(|| ApiError::Validation {
        message: "Invalid rider data".to_string(),
        errors: vec![FieldError {
            field: "eventId",
            message: "Event not found",
        }],
    })?;

    Ok((StatusCode::CREATED, Json(rider)))
}

pub async fn delete_rider(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = with_store(&state, move |s| s.delete_rider(id)).await?;
    if !deleted {
        return Err(ApiError::NotFound("Rider not found"));
    }
    Ok(Json(json!({ "message": "Rider deleted successfully" })))
}
