pub mod memory;
pub mod migrations;
pub mod seed;
pub mod sqlite;

pub use memory::MemStore;
pub use sqlite::SqliteStore;

use anyhow::Result;
use ridereel_types::{Event, NewEvent, NewPurchase, NewRider, Purchase, Rider, User};

/// Backing store for the catalog, the entitlement ledger, and admin
/// accounts. One instance is constructed at process start and shared behind
/// an `Arc`; implementations serialize writes internally, so every method
/// takes `&self`.
///
/// List operations return rows in ascending id order (insertion order).
pub trait Store: Send + Sync {
    // -- Users --

    fn create_user(&self, username: &str, password_hash: &str) -> Result<User>;
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    // -- Events --

    fn list_events(&self) -> Result<Vec<Event>>;
    fn get_event(&self, id: i64) -> Result<Option<Event>>;
    fn create_event(&self, event: &NewEvent) -> Result<Event>;
    /// Deletes the event's riders first, then the event itself, as a single
    /// logical operation. Returns false when no such event exists.
    fn delete_event(&self, id: i64) -> Result<bool>;

    // -- Riders --

    fn list_riders(&self) -> Result<Vec<Rider>>;
    fn riders_by_event(&self, event_id: i64) -> Result<Vec<Rider>>;
    fn get_rider(&self, id: i64) -> Result<Option<Rider>>;
    fn create_rider(&self, rider: &NewRider) -> Result<Rider>;
    /// Ledger rows referencing the rider are left untouched.
    fn delete_rider(&self, id: i64) -> Result<bool>;

    // -- Entitlement ledger --

    /// Appends an immutable purchase row. Not idempotent: calling twice
    /// records two rows.
    fn record_purchase(&self, purchase: &NewPurchase) -> Result<Purchase>;
    /// True iff any purchase matches the email (case-insensitive) and the
    /// rider id. "Not purchased" is a normal false, never an error.
    fn is_entitled(&self, email: &str, rider_id: i64) -> Result<bool>;
    fn purchases_by_email(&self, email: &str) -> Result<Vec<Purchase>>;
    /// Purchases attributed to the event. Attribution uses the event
    /// snapshot taken at record time, so totals survive rider deletion;
    /// rows recorded against a then-unknown rider fall back to the current
    /// rider set.
    fn sales_count_for_event(&self, event_id: i64) -> Result<i64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ridereel_types::PaymentMethod;

    fn new_event(name: &str) -> NewEvent {
        NewEvent {
            name: name.to_string(),
            date: "June 15-17, 2023".to_string(),
            thumbnail_url: "https://example.com/event.jpg".to_string(),
        }
    }

    fn new_rider(name: &str, event_id: i64) -> NewRider {
        NewRider {
            name: name.to_string(),
            event_id,
            price: 80,
            thumbnail_url: "https://example.com/rider.jpg".to_string(),
            video_url: "https://example.com/ride.mp4".to_string(),
        }
    }

    fn purchase(email: &str, rider_id: i64) -> NewPurchase {
        NewPurchase {
            email: email.to_string(),
            rider_id,
            payment_method: PaymentMethod::Stripe,
            amount: 20,
        }
    }

    /// Shared behavioral suite, run against both backends.
    fn entitlement_is_case_insensitive(store: &dyn Store) {
        let event = store.create_event(&new_event("Spring Classic")).unwrap();
        let rider = store.create_rider(&new_rider("Jane Doe", event.id)).unwrap();

        store.record_purchase(&purchase("Jane@Example.COM", rider.id)).unwrap();

        assert!(store.is_entitled("jane@example.com", rider.id).unwrap());
        assert!(store.is_entitled("JANE@EXAMPLE.COM", rider.id).unwrap());
        assert!(!store.is_entitled("jane@example.com", rider.id + 1).unwrap());
        assert!(!store.is_entitled("someone@else.com", rider.id).unwrap());
    }

    fn event_delete_cascades_to_riders(store: &dyn Store) {
        let keep = store.create_event(&new_event("Keep")).unwrap();
        let gone = store.create_event(&new_event("Gone")).unwrap();
        store.create_rider(&new_rider("A", gone.id)).unwrap();
        store.create_rider(&new_rider("B", gone.id)).unwrap();
        let kept = store.create_rider(&new_rider("C", keep.id)).unwrap();

        assert!(store.delete_event(gone.id).unwrap());
        assert!(store.riders_by_event(gone.id).unwrap().is_empty());
        assert!(store.get_event(gone.id).unwrap().is_none());
        // The untouched event keeps its rider.
        assert_eq!(store.riders_by_event(keep.id).unwrap().len(), 1);
        assert!(store.get_rider(kept.id).unwrap().is_some());

        assert!(!store.delete_event(gone.id).unwrap());
    }

    fn sales_count_survives_rider_deletion(store: &dyn Store) {
        let event = store.create_event(&new_event("Summer Showdown")).unwrap();
        let r1 = store.create_rider(&new_rider("R1", event.id)).unwrap();
        let r2 = store.create_rider(&new_rider("R2", event.id)).unwrap();

        store.record_purchase(&purchase("a@x.com", r1.id)).unwrap();
        store.record_purchase(&purchase("b@x.com", r1.id)).unwrap();
        store.record_purchase(&purchase("c@x.com", r2.id)).unwrap();
        assert_eq!(store.sales_count_for_event(event.id).unwrap(), 3);

        // Deleting a rider leaves its ledger rows counting toward the event.
        assert!(store.delete_rider(r1.id).unwrap());
        assert_eq!(store.sales_count_for_event(event.id).unwrap(), 3);
        assert!(store.is_entitled("a@x.com", r1.id).unwrap());
    }

    fn lists_are_in_insertion_order(store: &dyn Store) {
        let e1 = store.create_event(&new_event("First")).unwrap();
        let e2 = store.create_event(&new_event("Second")).unwrap();
        let events = store.list_events().unwrap();
        let ids: Vec<i64> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![e1.id, e2.id]);
        assert!(e1.id < e2.id);
    }

    fn duplicate_purchases_both_recorded(store: &dyn Store) {
        let event = store.create_event(&new_event("Dup")).unwrap();
        let rider = store.create_rider(&new_rider("R", event.id)).unwrap();
        store.record_purchase(&purchase("dup@x.com", rider.id)).unwrap();
        store.record_purchase(&purchase("DUP@x.com", rider.id)).unwrap();
        assert_eq!(store.purchases_by_email("dup@X.com").unwrap().len(), 2);
        assert_eq!(store.sales_count_for_event(event.id).unwrap(), 2);
    }

    fn run_suite(store: &dyn Store) {
        entitlement_is_case_insensitive(store);
        event_delete_cascades_to_riders(store);
        sales_count_survives_rider_deletion(store);
        duplicate_purchases_both_recorded(store);
    }

    #[test]
    fn mem_store_suite() {
        let store = MemStore::new();
        run_suite(&store);
    }

    #[test]
    fn sqlite_store_suite() {
        let store = SqliteStore::open_in_memory().unwrap();
        run_suite(&store);
    }

    #[test]
    fn mem_store_ordering() {
        lists_are_in_insertion_order(&MemStore::new());
    }

    #[test]
    fn sqlite_store_ordering() {
        lists_are_in_insertion_order(&SqliteStore::open_in_memory().unwrap());
    }

    #[test]
    fn users_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.get_user_by_username("admin").unwrap().is_none());
        let user = store.create_user("admin", "$argon2id$fake").unwrap();
        let found = store.get_user_by_username("admin").unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.password_hash, "$argon2id$fake");
    }
}
