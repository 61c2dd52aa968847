use std::collections::BTreeMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use chrono::Utc;

use ridereel_types::{Event, NewEvent, NewPurchase, NewRider, Purchase, Rider, User};

use crate::Store;

/// Non-persistent fallback store: plain maps behind a mutex. Used when no
/// database path is configured. BTreeMaps keep iteration in ascending id
/// order, which is the required listing order.
pub struct MemStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: BTreeMap<i64, User>,
    events: BTreeMap<i64, Event>,
    riders: BTreeMap<i64, Rider>,
    purchases: BTreeMap<i64, PurchaseRow>,
    next_user_id: i64,
    next_event_id: i64,
    next_rider_id: i64,
    next_purchase_id: i64,
}

/// Ledger row plus the event snapshot taken at record time (see
/// `Store::sales_count_for_event`).
struct PurchaseRow {
    purchase: Purchase,
    event_id: Option<i64>,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    fn with_inner<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Inner) -> Result<T>,
    {
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| anyhow!("store lock poisoned: {}", e))?;
        f(&mut inner)
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemStore {
    // -- Users --

    fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        self.with_inner(|inner| {
            inner.next_user_id += 1;
            let user = User {
                id: inner.next_user_id,
                username: username.to_string(),
                password_hash: password_hash.to_string(),
            };
            inner.users.insert(user.id, user.clone());
            Ok(user)
        })
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.with_inner(|inner| {
            Ok(inner
                .users
                .values()
                .find(|u| u.username == username)
                .cloned())
        })
    }

    // -- Events --

    fn list_events(&self) -> Result<Vec<Event>> {
        self.with_inner(|inner| Ok(inner.events.values().cloned().collect()))
    }

    fn get_event(&self, id: i64) -> Result<Option<Event>> {
        self.with_inner(|inner| Ok(inner.events.get(&id).cloned()))
    }

    fn create_event(&self, event: &NewEvent) -> Result<Event> {
        self.with_inner(|inner| {
            inner.next_event_id += 1;
            let event = Event {
                id: inner.next_event_id,
                name: event.name.clone(),
                date: event.date.clone(),
                thumbnail_url: event.thumbnail_url.clone(),
                created_at: Utc::now(),
            };
            inner.events.insert(event.id, event.clone());
            Ok(event)
        })
    }

    fn delete_event(&self, id: i64) -> Result<bool> {
        self.with_inner(|inner| {
            inner.riders.retain(|_, r| r.event_id != id);
            Ok(inner.events.remove(&id).is_some())
        })
    }

    // -- Riders --

    fn list_riders(&self) -> Result<Vec<Rider>> {
        self.with_inner(|inner| Ok(inner.riders.values().cloned().collect()))
    }

    fn riders_by_event(&self, event_id: i64) -> Result<Vec<Rider>> {
        self.with_inner(|inner| {
            Ok(inner
                .riders
                .values()
                .filter(|r| r.event_id == event_id)
                .cloned()
                .collect())
        })
    }

    fn get_rider(&self, id: i64) -> Result<Option<Rider>> {
        self.with_inner(|inner| Ok(inner.riders.get(&id).cloned()))
    }

    fn create_rider(&self, rider: &NewRider) -> Result<Rider> {
        self.with_inner(|inner| {
            inner.next_rider_id += 1;
            let rider = Rider {
                id: inner.next_rider_id,
                event_id: rider.event_id,
                name: rider.name.clone(),
                price: rider.price,
                thumbnail_url: rider.thumbnail_url.clone(),
                video_url: rider.video_url.clone(),
                created_at: Utc::now(),
            };
            inner.riders.insert(rider.id, rider.clone());
            Ok(rider)
        })
    }

    fn delete_rider(&self, id: i64) -> Result<bool> {
        self.with_inner(|inner| Ok(inner.riders.remove(&id).is_some()))
    }

    // -- Entitlement ledger --

    fn record_purchase(&self, purchase: &NewPurchase) -> Result<Purchase> {
        self.with_inner(|inner| {
            let event_id = inner
                .riders
                .get(&purchase.rider_id)
                .map(|r| r.event_id);
            inner.next_purchase_id += 1;
            let row = Purchase {
                id: inner.next_purchase_id,
                email: purchase.email.clone(),
                rider_id: purchase.rider_id,
                payment_method: purchase.payment_method,
                amount: purchase.amount,
                created_at: Utc::now(),
            };
            inner.purchases.insert(
                row.id,
                PurchaseRow {
                    purchase: row.clone(),
                    event_id,
                },
            );
            Ok(row)
        })
    }

    fn is_entitled(&self, email: &str, rider_id: i64) -> Result<bool> {
        self.with_inner(|inner| {
            Ok(inner.purchases.values().any(|row| {
                row.purchase.rider_id == rider_id
                    && row.purchase.email.eq_ignore_ascii_case(email)
            }))
        })
    }

    fn purchases_by_email(&self, email: &str) -> Result<Vec<Purchase>> {
        self.with_inner(|inner| {
            Ok(inner
                .purchases
                .values()
                .filter(|row| row.purchase.email.eq_ignore_ascii_case(email))
                .map(|row| row.purchase.clone())
                .collect())
        })
    }

    fn sales_count_for_event(&self, event_id: i64) -> Result<i64> {
        self.with_inner(|inner| {
            let count = inner
                .purchases
                .values()
                .filter(|row| match row.event_id {
                    Some(snapshot) => snapshot == event_id,
                    // No snapshot: the rider was unknown at record time.
                    // Check the current rider set instead.
                    None => inner
                        .riders
                        .get(&row.purchase.rider_id)
                        .is_some_and(|r| r.event_id == event_id),
                })
                .count();
            Ok(count as i64)
        })
    }
}
