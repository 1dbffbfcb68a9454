// src/database.rs

use crate::error::Result;
use crate::models::Item;
use crate::repository;
use log::{debug, info};
use rusqlite::Connection;

pub fn init_db(conn: &Connection) -> Result<()> {
    debug!("[DB] init_db: Checking database schema...");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS items (
            id TEXT PRIMARY KEY,
            created_at INTEGER NOT NULL,
            last_reviewed INTEGER,
            review_interval INTEGER NOT NULL DEFAULT 1,
            review_ease REAL NOT NULL DEFAULT 2.5,
            struggle_count INTEGER NOT NULL DEFAULT 0,
            last_struggled_at INTEGER,
            total_struggle_time REAL NOT NULL DEFAULT 0.0,
            review_count INTEGER NOT NULL DEFAULT 0,
            is_externally_generated INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE IF NOT EXISTS item_topics (
            item_id TEXT NOT NULL,
            topic TEXT NOT NULL,
            PRIMARY KEY (item_id, topic)
        );
        CREATE TABLE IF NOT EXISTS reviews (
            id INTEGER PRIMARY KEY,
            item_id TEXT NOT NULL,
            remembered INTEGER NOT NULL,
            time_spent REAL NOT NULL DEFAULT 0.0,
            reviewed_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_reviews_item ON reviews (item_id, reviewed_at);
        ",
    )?;

    let count: i64 = conn.query_row("SELECT count(*) FROM items", [], |row| row.get(0))?;
    debug!("[DB] init_db: {} items present", count);
    Ok(())
}

/// Upserts a JSON array of items in a single transaction. Returns how many
/// items were written.
pub fn import_items(conn: &Connection, json: &str) -> Result<usize> {
    let items: Vec<Item> = serde_json::from_str(json)?;

    let tx = conn.unchecked_transaction()?;
    for item in &items {
        repository::save_item(&tx, item)?;
    }
    tx.commit()?;

    info!("[DB] Imported {} items", items.len());
    Ok(items.len())
}
