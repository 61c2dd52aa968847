//! Payment provider seam. The storefront talks to two provider shapes: a
//! card-style flow (payment intent + client secret) and a wallet-style flow
//! (order create + capture). Both implement [`PaymentProvider`] and both
//! converge on the same confirmation contract: on success the client
//! reports `(email, riderId, method, amount)` to the purchases endpoint,
//! which writes the entitlement. Card data never touches this process.
//!
//! The bundled implementations fabricate provider responses; production
//! wiring swaps in real SDK calls behind the same trait.

mod pricing;
mod simulated;

pub use pricing::{HORSE_RATE, MAX_HORSES, checkout_amount};
pub use simulated::{CardProvider, WalletProvider};

use serde::Serialize;
use thiserror::Error;

use ridereel_types::PaymentMethod;

#[derive(Debug, Error)]
pub enum PaymentError {
    /// Checkout quantity outside the promotional 1..=4 horse range.
    #[error("quantity must be between 1 and {MAX_HORSES} horses, got {0}")]
    InvalidQuantity(i64),
    #[error("Invalid amount. Amount must be a positive number.")]
    InvalidAmount,
    /// Reference presented for confirmation does not belong to this
    /// provider. No entitlement may be granted off the back of this.
    #[error("unknown payment reference: {0}")]
    UnknownReference(String),
    /// Provider-side failure; the caller may retry the confirmation.
    #[error("payment provider error: {0}")]
    Provider(String),
}

/// A payment backend capable of opening a checkout and confirming it.
pub trait PaymentProvider: Send + Sync {
    fn method(&self) -> PaymentMethod;

    /// Setup token handed to the browser-side SDK.
    fn client_token(&self) -> Result<String, PaymentError>;

    /// Open a checkout for `amount` dollars. The returned reference is what
    /// the client later completes against.
    fn begin(&self, amount: f64) -> Result<CheckoutSession, PaymentError>;

    /// Confirm a previously begun checkout. A failure here must leave the
    /// entitlement ledger untouched.
    fn confirm(&self, reference: &str) -> Result<Confirmation, PaymentError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutStatus {
    Created,
    Completed,
}

#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub reference: String,
    /// Card-style: the secret the browser SDK completes with.
    pub client_secret: Option<String>,
    /// Wallet-style: the approval link the buyer is sent through.
    pub approve_url: Option<String>,
    pub status: CheckoutStatus,
}

#[derive(Debug, Clone)]
pub struct Confirmation {
    pub reference: String,
    pub capture_id: String,
    pub status: CheckoutStatus,
    pub payer_email: Option<String>,
}
