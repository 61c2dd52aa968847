use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{ApiError, ValidJson};
use crate::state::AppState;

/// Card-style branch: mint a payment intent and hand back its client
/// secret. The charge itself happens browser-side against the provider.
pub async fn create_payment_intent(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateIntentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.card.begin(req.amount)?;
    Ok(Json(json!({ "clientSecret": session.client_secret })))
}

#[derive(Debug, Deserialize)]
pub struct CreateIntentRequest {
    pub amount: f64,
}

/// Wallet-style branch: setup token for the browser SDK.
pub async fn paypal_setup(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let token = state.wallet.client_token()?;
    Ok(Json(json!({ "clientToken": token })))
}

/// Order create body. The browser SDK sends the amount as a string, so the
/// field is accepted loosely and validated here with the provider's
/// historical wording.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub intent: Option<String>,
}

pub async fn create_paypal_order(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateOrderRequest>,
) -> Result<Response, ApiError> {
    let amount = req.amount.as_ref().and_then(loose_f64);
    let Some(amount) = amount.filter(|a| *a > 0.0) else {
        return Ok(order_error("Invalid amount. Amount must be a positive number."));
    };
    if req.currency.as_deref().is_none_or(str::is_empty) {
        return Ok(order_error("Invalid currency. Currency is required."));
    }
    if req.intent.as_deref().is_none_or(str::is_empty) {
        return Ok(order_error("Invalid intent. Intent is required."));
    }

    let session = state.wallet.begin(amount)?;
    Ok(Json(json!({
        "id": session.reference,
        "status": session.status,
        "links": [
            {
                "href": session.approve_url,
                "rel": "approve",
                "method": "GET"
            }
        ]
    }))
    .into_response())
}

/// Capture confirms the order with the provider. On failure nothing is
/// unlocked: the entitlement write only happens when the client reports the
/// confirmed payment to `POST /api/purchases`.
pub async fn capture_paypal_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let confirmation = state.wallet.confirm(&order_id)?;

    Ok(Json(json!({
        "id": confirmation.reference,
        "status": confirmation.status,
        "payer": {
            "email_address": confirmation.payer_email
        },
        "purchase_units": [
            {
                "payments": {
                    "captures": [
                        {
                            "id": confirmation.capture_id,
                            "status": confirmation.status
                        }
                    ]
                }
            }
        ]
    })))
}

fn order_error(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

/// parseFloat-style coercion: JSON numbers pass through, numeric strings
/// parse, anything else is rejected.
fn loose_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
