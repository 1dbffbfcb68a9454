// src/struggle.rs

use crate::config::StruggleConfig;
use crate::interval::days_between;
use crate::models::Item;
use chrono::{DateTime, Utc};

/// Ranking weight for Repeat mode. Higher means the item needs attention
/// sooner. Derived on the fly and never persisted.
///
/// Grows with the struggle count, the time sunk into failed attempts and how
/// recently the last failure happened (within the recency window); shrinks as
/// the item gets easier.
pub fn calculate_question_weight(
    item: &Item,
    now: DateTime<Utc>,
    config: &StruggleConfig,
) -> f64 {
    let ease_factor = item.review_ease.max(config.ease_floor);

    let recency_factor = match item.last_struggled_at {
        Some(at) => {
            let days_since = days_between(at, now);
            if days_since < config.recency_window_days {
                1.0 + (config.recency_window_days - days_since) * config.recency_step
            } else {
                1.0
            }
        }
        None => 1.0,
    };

    let time_factor =
        (item.total_struggle_time / config.time_scale + 1.0).ln() * config.time_weight;
    let count_term = (f64::from(item.struggle_count) + 1.0).ln() * config.count_weight;

    (count_term * recency_factor + time_factor) / ease_factor
}
