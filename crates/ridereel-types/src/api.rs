use serde::{Deserialize, Serialize};

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: i64,
    pub username: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct AdminUserResponse {
    pub id: i64,
    pub username: String,
}

// -- Purchases --

/// Raw purchase body. Field-level validation (payment method, quantity)
/// happens in the handler so malformed values come back as a 400 with a
/// field error list rather than a deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseRequest {
    pub email: String,
    pub rider_id: i64,
    pub payment_method: String,
    pub amount: i64,
    /// Promotional horse count; affects only the charged amount.
    #[serde(default)]
    pub quantity: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct PurchaseCheckResponse {
    pub purchased: bool,
}

// -- Stats --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSales {
    pub event_id: i64,
    pub event_name: String,
    pub sales_count: i64,
    pub revenue: i64,
}

// -- Bulk import --

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub csv: String,
}
