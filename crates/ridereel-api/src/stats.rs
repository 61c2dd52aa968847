use axum::{Json, extract::State, response::IntoResponse};

use ridereel_types::api::EventSales;

use crate::error::ApiError;
use crate::state::{AppState, with_store};

/// Revenue is reported at the fixed $80 default price, not the rider's own
/// listed price.
const DEFAULT_PRICE: i64 = 80;

pub async fn sales_by_event(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let sales = with_store(&state, |s| {
        let events = s.list_events()?;
        events
            .into_iter()
            .map(|event| {
                let sales_count = s.sales_count_for_event(event.id)?;
                Ok(EventSales {
                    event_id: event.id,
                    event_name: event.name,
                    sales_count,
                    revenue: sales_count * DEFAULT_PRICE,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()
    })
    .await?;

    Ok(Json(sales))
}
