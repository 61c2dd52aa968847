use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use ridereel_payments::checkout_amount;
use ridereel_types::api::{CreatePurchaseRequest, PurchaseCheckResponse};
use ridereel_types::{NewPurchase, PaymentMethod};

use crate::error::{ApiError, FieldError, ValidJson};
use crate::state::{AppState, with_store};

/// The confirmation callback both payment branches converge on: after a
/// provider reports success, the client posts here and the entitlement is
/// written. One ledger row per transaction regardless of horse quantity;
/// quantity only scales the charged amount.
pub async fn create_purchase(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreatePurchaseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut errors = Vec::new();

    let email = req.email.trim().to_string();
    if email.is_empty() {
        errors.push(FieldError {
            field: "email",
            message: "Email is required",
        });
    }

    let payment_method = PaymentMethod::parse(&req.payment_method);
    if payment_method.is_none() {
        errors.push(FieldError {
            field: "paymentMethod",
            message: "must be \"stripe\" or \"paypal\"",
        });
    }

    if let Some(quantity) = req.quantity {
        if checkout_amount(quantity).is_err() {
            errors.push(FieldError {
                field: "quantity",
                message: "must be between 1 and 4",
            });
        }
    }

    let Some(payment_method) = payment_method.filter(|_| errors.is_empty()) else {
        return Err(ApiError::Validation {
            message: "Invalid purchase data".to_string(),
            errors,
        });
    };

    let purchase = with_store(&state, move |s| {
        s.record_purchase(&NewPurchase {
            email,
            rider_id: req.rider_id,
            payment_method,
            amount: req.amount,
        })
    })
    .await?;

    Ok((StatusCode::CREATED, Json(purchase)))
}

#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    pub email: Option<String>,
    #[serde(rename = "riderId")]
    pub rider_id: Option<i64>,
}

pub async fn check_purchase(
    State(state): State<AppState>,
    Query(query): Query<CheckQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(email), Some(rider_id)) = (query.email, query.rider_id) else {
        return Err(ApiError::validation("Email and riderId are required"));
    };

    let purchased = with_store(&state, move |s| s.is_entitled(&email, rider_id)).await?;
    Ok(Json(PurchaseCheckResponse { purchased }))
}
