// src/repository.rs

use crate::error::Result;
use crate::models::{AnswerRecord, Item, ItemId, ReviewOutcome};
use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::{BTreeSet, HashMap};

const ITEM_COLUMNS: &str = "id, created_at, last_reviewed, review_interval, review_ease, \
     struggle_count, last_struggled_at, total_struggle_time, review_count, is_externally_generated";

fn to_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

fn from_millis(idx: usize, ms: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, ms))
}

fn optional_millis(idx: usize, ms: Option<i64>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    ms.map(|ms| from_millis(idx, ms)).transpose()
}

/// Maps an `items` row selected with `ITEM_COLUMNS`. Topics are filled in
/// separately.
fn item_from_row(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        created_at: from_millis(1, row.get(1)?)?,
        last_reviewed: optional_millis(2, row.get(2)?)?,
        review_interval: row.get(3)?,
        review_ease: row.get(4)?,
        struggle_count: row.get(5)?,
        last_struggled_at: optional_millis(6, row.get(6)?)?,
        total_struggle_time: row.get(7)?,
        review_count: row.get(8)?,
        topics: BTreeSet::new(),
        is_externally_generated: row.get(9)?,
    })
}

pub fn get_topics_for_item(conn: &Connection, item_id: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn.prepare("SELECT topic FROM item_topics WHERE item_id = ?")?;
    let topics = stmt
        .query_map([item_id], |row| row.get(0))?
        .collect::<rusqlite::Result<BTreeSet<String>>>()?;
    Ok(topics)
}

/// Loads the whole item population, oldest first (ties by id).
pub fn load_items(conn: &Connection) -> Result<Vec<Item>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ITEM_COLUMNS} FROM items ORDER BY created_at ASC, id ASC"
    ))?;
    let mut items = stmt
        .query_map([], item_from_row)?
        .collect::<rusqlite::Result<Vec<Item>>>()?;

    for item in &mut items {
        item.topics = get_topics_for_item(conn, &item.id)?;
    }
    debug!("[DB] Loaded {} items", items.len());
    Ok(items)
}

pub fn get_item(conn: &Connection, item_id: &str) -> Result<Option<Item>> {
    let item = conn
        .query_row(
            &format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?"),
            [item_id],
            item_from_row,
        )
        .optional()?;

    match item {
        Some(mut item) => {
            item.topics = get_topics_for_item(conn, &item.id)?;
            Ok(Some(item))
        }
        None => Ok(None),
    }
}

/// Writes an item snapshot back, replacing any stored version and its topics.
pub fn save_item(conn: &Connection, item: &Item) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO items ({ITEM_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ),
        params![
            item.id,
            to_millis(item.created_at),
            item.last_reviewed.map(to_millis),
            item.review_interval,
            item.review_ease,
            item.struggle_count,
            item.last_struggled_at.map(to_millis),
            item.total_struggle_time,
            item.review_count,
            item.is_externally_generated,
        ],
    )?;

    conn.execute("DELETE FROM item_topics WHERE item_id = ?", [&item.id])?;
    let mut stmt =
        conn.prepare("INSERT OR IGNORE INTO item_topics (item_id, topic) VALUES (?, ?)")?;
    for topic in &item.topics {
        stmt.execute(params![item.id, topic])?;
    }
    debug!("[DB] Saved item {}", item.id);
    Ok(())
}

/// Records a raw review event.
pub fn log_review(
    conn: &Connection,
    item_id: &str,
    outcome: ReviewOutcome,
    reviewed_at: DateTime<Utc>,
) -> Result<()> {
    conn.execute(
        "INSERT INTO reviews (item_id, remembered, time_spent, reviewed_at) VALUES (?, ?, ?, ?)",
        params![
            item_id,
            outcome.remembered,
            outcome.time_spent_seconds,
            to_millis(reviewed_at)
        ],
    )?;
    Ok(())
}

pub fn get_review_log_count(conn: &Connection, item_id: &str) -> Result<i64> {
    let count = conn.query_row(
        "SELECT count(*) FROM reviews WHERE item_id = ?",
        [item_id],
        |r| r.get(0),
    )?;
    Ok(count)
}

/// Builds knowledge-gap input from the most recent review of every reviewed
/// item: correct means the latest attempt was remembered.
pub fn latest_answers(conn: &Connection) -> Result<HashMap<ItemId, AnswerRecord>> {
    let mut stmt = conn.prepare(
        "SELECT r.item_id, r.remembered
         FROM reviews r
         WHERE r.id = (
            SELECT r2.id FROM reviews r2
            WHERE r2.item_id = r.item_id
            ORDER BY r2.reviewed_at DESC, r2.id DESC
            LIMIT 1
         )",
    )?;
    let latest = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut answers = HashMap::with_capacity(latest.len());
    for (item_id, correct) in latest {
        let topics = get_topics_for_item(conn, &item_id)?;
        answers.insert(item_id, AnswerRecord { correct, topics });
    }
    debug!("[DB] Latest answers for {} items", answers.len());
    Ok(answers)
}
