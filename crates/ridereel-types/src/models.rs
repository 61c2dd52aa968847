/// Core storefront records. Wire names stay camelCase for compatibility
/// with the JSON the admin panel and storefront pages already consume.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A barrel-racing competition grouping purchasable ride videos.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub name: String,
    /// Free text, e.g. "June 15-17, 2023".
    pub date: String,
    pub thumbnail_url: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub name: String,
    pub date: String,
    pub thumbnail_url: String,
}

/// A purchasable ride video, tied to exactly one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rider {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    /// Listed price in whole dollars.
    pub price: i64,
    pub thumbnail_url: String,
    pub video_url: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a rider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRider {
    pub name: String,
    pub event_id: i64,
    #[serde(default = "default_price")]
    pub price: i64,
    pub thumbnail_url: String,
    pub video_url: String,
}

fn default_price() -> i64 {
    80
}

/// An immutable record proving an email has unlocked a rider's video.
/// The rider reference is soft: purchases survive catalog edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: i64,
    pub email: String,
    pub rider_id: i64,
    pub payment_method: PaymentMethod,
    /// Amount charged in whole dollars.
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPurchase {
    pub email: String,
    pub rider_id: i64,
    pub payment_method: PaymentMethod,
    pub amount: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Stripe,
    Paypal,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Stripe => "stripe",
            PaymentMethod::Paypal => "paypal",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stripe" => Some(PaymentMethod::Stripe),
            "paypal" => Some(PaymentMethod::Paypal),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin account. Deliberately not serializable: the hash never leaves the
/// server.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}
