use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use ridereel_payments::PaymentError;

#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Request-level failures, mapped onto the HTTP surface in one place.
/// Storage detail is logged server-side and never leaks to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input shape; 400 with a field error list.
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },
    #[error("{0}")]
    NotFound(&'static str),
    #[error("Unauthorized")]
    Auth,
    #[error("storage failure")]
    Storage(#[from] anyhow::Error),
    #[error(transparent)]
    Payment(#[from] PaymentError),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation { message, errors } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": message, "errors": errors })),
            )
                .into_response(),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": message })),
            )
                .into_response(),
            ApiError::Auth => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Unauthorized" })),
            )
                .into_response(),
            ApiError::Storage(err) => {
                error!("storage failure: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Internal server error" })),
                )
                    .into_response()
            }
            ApiError::Payment(err) => payment_response(err),
        }
    }
}

/// Payment errors keep the provider endpoints' historical `error` key.
/// Request-shape problems are the caller's fault (400); anything else is a
/// retryable provider-side failure (502) that granted nothing.
fn payment_response(err: PaymentError) -> Response {
    match err {
        PaymentError::InvalidAmount | PaymentError::InvalidQuantity(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        PaymentError::UnknownReference(_) | PaymentError::Provider(_) => {
            error!("payment provider failure: {}", err);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response()
        }
    }
}

/// `Json` wrapper that turns body rejections into the 400 validation shape
/// instead of axum's default plain-text 422.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(validation_rejection(rejection)),
        }
    }
}

fn validation_rejection(rejection: JsonRejection) -> ApiError {
    ApiError::validation(rejection.body_text())
}
