use rand::distr::{Alphanumeric, SampleString};

use ridereel_types::PaymentMethod;

use crate::{CheckoutSession, CheckoutStatus, Confirmation, PaymentError, PaymentProvider};

const INTENT_PREFIX: &str = "pi_simulated_";
const ORDER_PREFIX: &str = "SIMULATED_ORDER_";
const CAPTURE_PREFIX: &str = "SIMULATED_CAPTURE_";

/// Card-style provider: hands the client a payment-intent secret, confirms
/// instantly. Stands in for a real card SDK in development.
pub struct CardProvider;

impl PaymentProvider for CardProvider {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Stripe
    }

    fn client_token(&self) -> Result<String, PaymentError> {
        Ok("pk_test_placeholder".to_string())
    }

    fn begin(&self, amount: f64) -> Result<CheckoutSession, PaymentError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(PaymentError::InvalidAmount);
        }
        let reference = sim_reference(INTENT_PREFIX, 13);
        Ok(CheckoutSession {
            client_secret: Some(reference.clone()),
            reference,
            approve_url: None,
            status: CheckoutStatus::Created,
        })
    }

    fn confirm(&self, reference: &str) -> Result<Confirmation, PaymentError> {
        if !reference.starts_with(INTENT_PREFIX) {
            return Err(PaymentError::UnknownReference(reference.to_string()));
        }
        Ok(Confirmation {
            reference: reference.to_string(),
            capture_id: sim_reference("ch_simulated_", 13),
            status: CheckoutStatus::Completed,
            payer_email: None,
        })
    }
}

/// Wallet-style provider: order create + capture, echoing the shapes the
/// real wallet SDK would return.
pub struct WalletProvider;

impl PaymentProvider for WalletProvider {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Paypal
    }

    fn client_token(&self) -> Result<String, PaymentError> {
        Ok("placeholder_token_until_real_credentials_are_provided".to_string())
    }

    fn begin(&self, amount: f64) -> Result<CheckoutSession, PaymentError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(PaymentError::InvalidAmount);
        }
        Ok(CheckoutSession {
            reference: sim_reference(ORDER_PREFIX, 8),
            client_secret: None,
            approve_url: Some("https://example.com/approve".to_string()),
            status: CheckoutStatus::Created,
        })
    }

    fn confirm(&self, reference: &str) -> Result<Confirmation, PaymentError> {
        if !reference.starts_with(ORDER_PREFIX) {
            return Err(PaymentError::UnknownReference(reference.to_string()));
        }
        Ok(Confirmation {
            reference: reference.to_string(),
            capture_id: sim_reference(CAPTURE_PREFIX, 8),
            status: CheckoutStatus::Completed,
            payer_email: Some("simulated-buyer@example.com".to_string()),
        })
    }
}

fn sim_reference(prefix: &str, len: usize) -> String {
    let suffix = Alphanumeric
        .sample_string(&mut rand::rng(), len)
        .to_lowercase();
    format!("{}{}", prefix, suffix)
}
