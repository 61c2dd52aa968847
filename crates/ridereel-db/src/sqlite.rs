use std::path::Path;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{info, warn};

use ridereel_types::{Event, NewEvent, NewPurchase, NewRider, PaymentMethod, Purchase, Rider, User};

use crate::{Store, migrations};

/// SQLite-backed store. A single connection behind a mutex; WAL mode keeps
/// concurrent readers cheap.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| anyhow!("store lock poisoned: {}", e))?;
        f(&mut conn)
    }
}

impl Store for SqliteStore {
    // -- Users --

    fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, password) VALUES (?1, ?2)",
                params![username, password_hash],
            )?;
            let id = conn.last_insert_rowid();
            query_user(conn, id)?.ok_or_else(|| anyhow!("user {} missing after insert", id))
        })
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, username, password FROM users WHERE username = ?1",
                    [username],
                    map_user,
                )
                .optional()?;
            Ok(row)
        })
    }

    // -- Events --

    fn list_events(&self) -> Result<Vec<Event>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, date, thumbnail_url, created_at FROM events ORDER BY id",
            )?;
            let rows = stmt
                .query_map([], map_event)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    fn get_event(&self, id: i64) -> Result<Option<Event>> {
        self.with_conn(|conn| query_event(conn, id))
    }

    fn create_event(&self, event: &NewEvent) -> Result<Event> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO events (name, date, thumbnail_url) VALUES (?1, ?2, ?3)",
                params![event.name, event.date, event.thumbnail_url],
            )?;
            let id = conn.last_insert_rowid();
            query_event(conn, id)?.ok_or_else(|| anyhow!("event {} missing after insert", id))
        })
    }

    fn delete_event(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            // Riders first, then the event, in one transaction: a partial
            // cascade must surface as an error, never a silent half-delete.
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM riders WHERE event_id = ?1", [id])?;
            let deleted = tx.execute("DELETE FROM events WHERE id = ?1", [id])?;
            tx.commit()?;
            Ok(deleted > 0)
        })
    }

    // -- Riders --

    fn list_riders(&self) -> Result<Vec<Rider>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, event_id, name, price, thumbnail_url, video_url, created_at
                 FROM riders ORDER BY id",
            )?;
            let rows = stmt
                .query_map([], map_rider)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    fn riders_by_event(&self, event_id: i64) -> Result<Vec<Rider>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, event_id, name, price, thumbnail_url, video_url, created_at
                 FROM riders WHERE event_id = ?1 ORDER BY id",
            )?;
            let rows = stmt
                .query_map([event_id], map_rider)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    fn get_rider(&self, id: i64) -> Result<Option<Rider>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, event_id, name, price, thumbnail_url, video_url, created_at
                     FROM riders WHERE id = ?1",
                    [id],
                    map_rider,
                )
                .optional()?;
            Ok(row)
        })
    }

    fn create_rider(&self, rider: &NewRider) -> Result<Rider> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO riders (event_id, name, price, thumbnail_url, video_url)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    rider.event_id,
                    rider.name,
                    rider.price,
                    rider.thumbnail_url,
                    rider.video_url
                ],
            )?;
            let id = conn.last_insert_rowid();
            let row = conn.query_row(
                "SELECT id, event_id, name, price, thumbnail_url, video_url, created_at
                 FROM riders WHERE id = ?1",
                [id],
                map_rider,
            )?;
            Ok(row)
        })
    }

    fn delete_rider(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM riders WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    // -- Entitlement ledger --

    fn record_purchase(&self, purchase: &NewPurchase) -> Result<Purchase> {
        self.with_conn(|conn| {
            // Snapshot the rider's event so per-event sales totals survive
            // later catalog edits.
            let event_id: Option<i64> = conn
                .query_row(
                    "SELECT event_id FROM riders WHERE id = ?1",
                    [purchase.rider_id],
                    |row| row.get(0),
                )
                .optional()?;

            conn.execute(
                "INSERT INTO purchases (email, rider_id, event_id, payment_method, amount)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    purchase.email,
                    purchase.rider_id,
                    event_id,
                    purchase.payment_method.as_str(),
                    purchase.amount
                ],
            )?;
            let id = conn.last_insert_rowid();
            let row = conn.query_row(
                "SELECT id, email, rider_id, payment_method, amount, created_at
                 FROM purchases WHERE id = ?1",
                [id],
                map_purchase,
            )?;
            Ok(row)
        })
    }

    fn is_entitled(&self, email: &str, rider_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let entitled: bool = conn.query_row(
                "SELECT EXISTS(
                     SELECT 1 FROM purchases
                     WHERE LOWER(email) = LOWER(?1) AND rider_id = ?2
                 )",
                params![email, rider_id],
                |row| row.get(0),
            )?;
            Ok(entitled)
        })
    }

    fn purchases_by_email(&self, email: &str) -> Result<Vec<Purchase>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, email, rider_id, payment_method, amount, created_at
                 FROM purchases WHERE LOWER(email) = LOWER(?1) ORDER BY id",
            )?;
            let rows = stmt
                .query_map([email], map_purchase)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    fn sales_count_for_event(&self, event_id: i64) -> Result<i64> {
        self.with_conn(|conn| {
            // Attribution snapshot first; rows recorded against a
            // then-unknown rider fall back to the current rider set.
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM purchases
                 WHERE event_id = ?1
                    OR (event_id IS NULL AND rider_id IN
                        (SELECT id FROM riders WHERE event_id = ?1))",
                [event_id],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }
}

fn query_user(conn: &Connection, id: i64) -> Result<Option<User>> {
    let row = conn
        .query_row(
            "SELECT id, username, password FROM users WHERE id = ?1",
            [id],
            map_user,
        )
        .optional()?;
    Ok(row)
}

fn query_event(conn: &Connection, id: i64) -> Result<Option<Event>> {
    let row = conn
        .query_row(
            "SELECT id, name, date, thumbnail_url, created_at FROM events WHERE id = ?1",
            [id],
            map_event,
        )
        .optional()?;
    Ok(row)
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
    })
}

fn map_event(row: &Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        name: row.get(1)?,
        date: row.get(2)?,
        thumbnail_url: row.get(3)?,
        created_at: parse_timestamp(&row.get::<_, String>(4)?),
    })
}

fn map_rider(row: &Row<'_>) -> rusqlite::Result<Rider> {
    Ok(Rider {
        id: row.get(0)?,
        event_id: row.get(1)?,
        name: row.get(2)?,
        price: row.get(3)?,
        thumbnail_url: row.get(4)?,
        video_url: row.get(5)?,
        created_at: parse_timestamp(&row.get::<_, String>(6)?),
    })
}

fn map_purchase(row: &Row<'_>) -> rusqlite::Result<Purchase> {
    let method_raw: String = row.get(3)?;
    let payment_method = PaymentMethod::parse(&method_raw).unwrap_or_else(|| {
        warn!("Corrupt payment_method '{}' on purchase row", method_raw);
        PaymentMethod::Stripe
    });
    Ok(Purchase {
        id: row.get(0)?,
        email: row.get(1)?,
        rider_id: row.get(2)?,
        payment_method,
        amount: row.get(4)?,
        created_at: parse_timestamp(&row.get::<_, String>(5)?),
    })
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without
            // timezone. Parse as naive UTC and convert.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}': {}", raw, e);
            DateTime::default()
        })
}
