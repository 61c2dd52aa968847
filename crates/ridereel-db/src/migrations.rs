use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            username        TEXT NOT NULL UNIQUE,
            password        TEXT NOT NULL,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS events (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            name            TEXT NOT NULL,
            date            TEXT NOT NULL,
            thumbnail_url   TEXT NOT NULL,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS riders (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id        INTEGER NOT NULL REFERENCES events(id),
            name            TEXT NOT NULL,
            price           INTEGER NOT NULL DEFAULT 80,
            thumbnail_url   TEXT NOT NULL,
            video_url       TEXT NOT NULL,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_riders_event
            ON riders(event_id);

        -- rider_id is a soft reference on purpose: ledger rows must survive
        -- catalog edits. event_id is the attribution snapshot taken at
        -- record time (NULL when the rider was unknown).
        CREATE TABLE IF NOT EXISTS purchases (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            email           TEXT NOT NULL,
            rider_id        INTEGER NOT NULL,
            event_id        INTEGER,
            payment_method  TEXT NOT NULL,
            amount          INTEGER NOT NULL,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_purchases_email
            ON purchases(email);

        CREATE INDEX IF NOT EXISTS idx_purchases_event
            ON purchases(event_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
