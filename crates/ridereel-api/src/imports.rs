use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use ridereel_import::{ImportRow, ImportSummary, parse_csv, riders_to_csv};
use ridereel_types::NewRider;
use ridereel_types::api::ImportRequest;

use crate::error::{ApiError, ValidJson};
use crate::state::{AppState, with_store};

/// Parse only: returns the full preview (valid and invalid rows) so the
/// admin can inspect before committing.
pub async fn preview_import(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<ImportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = parse_rows(&state, req.csv).await?;
    let valid = rows.iter().filter(|r| r.valid).count();
    let invalid = rows.len() - valid;

    Ok(Json(json!({
        "rows": rows,
        "valid": valid,
        "invalid": invalid,
    })))
}

/// Parse, then commit the valid subset sequentially. No transaction: a late
/// failure leaves earlier rows in place and is only counted.
pub async fn import_riders(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<ImportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = parse_rows(&state, req.csv).await?;
    let valid_rows: Vec<ImportRow> = rows.into_iter().filter(|r| r.valid).collect();

    let summary = with_store(&state, move |s| {
        let mut summary = ImportSummary::default();
        for row in &valid_rows {
            let Some(event_id) = row.event_id else {
                continue;
            };
            let rider = NewRider {
                name: row.name.clone(),
                event_id,
                price: row.price as i64,
                thumbnail_url: row.thumbnail_url.clone(),
                video_url: row.video_url.clone(),
            };
            match s.create_rider(&rider) {
                Ok(_) => summary.success += 1,
                Err(e) => {
                    warn!("bulk import row '{}' failed: {:#}", row.name, e);
                    summary.failed += 1;
                }
            }
        }
        Ok(summary)
    })
    .await?;

    Ok(Json(summary))
}

async fn parse_rows(state: &AppState, csv: String) -> Result<Vec<ImportRow>, ApiError> {
    let events = with_store(state, |s| s.list_events()).await?;
    // Structural failures abort the whole batch with the specific reason.
    parse_csv(&csv, &events).map_err(|e| ApiError::validation(e.to_string()))
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// Case-insensitive rider-name substring filter.
    pub search: Option<String>,
    /// "all" or an event id, matching the admin dashboard's filter control.
    #[serde(rename = "eventId")]
    pub event_id: Option<String>,
}

pub async fn export_riders(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (riders, events) =
        with_store(&state, |s| Ok((s.list_riders()?, s.list_events()?))).await?;

    let search = query.search.unwrap_or_default().to_lowercase();
    let event_filter: Option<i64> = query
        .event_id
        .filter(|v| v != "all")
        .and_then(|v| v.parse().ok());

    let filtered: Vec<_> = riders
        .into_iter()
        .filter(|r| search.is_empty() || r.name.to_lowercase().contains(&search))
        .filter(|r| event_filter.is_none_or(|id| r.event_id == id))
        .collect();

    let csv = riders_to_csv(&filtered, &events);
    let filename = format!(
        "barrel_racing_riders_{}.csv",
        chrono::Utc::now().format("%Y-%m-%d")
    );

    Ok((
        [
            (
                header::CONTENT_TYPE.as_str(),
                "text/csv;charset=utf-8;".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION.as_str(),
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    ))
}
