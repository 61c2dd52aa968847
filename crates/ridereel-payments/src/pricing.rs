use crate::PaymentError;

/// Promotional per-horse rate in whole dollars. Deliberately independent of
/// the rider's listed price: the checkout charges per horse, the catalog
/// displays per video.
pub const HORSE_RATE: i64 = 20;

/// A single checkout covers at most this many horses.
pub const MAX_HORSES: i64 = 4;

/// Total charge for a checkout of `quantity` horses.
pub fn checkout_amount(quantity: i64) -> Result<i64, PaymentError> {
    if !(1..=MAX_HORSES).contains(&quantity) {
        return Err(PaymentError::InvalidQuantity(quantity));
    }
    Ok(HORSE_RATE * quantity)
}
