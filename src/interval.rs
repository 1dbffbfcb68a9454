// src/interval.rs

use crate::config::IntervalConfig;
use crate::constants::*;
use crate::models::{Item, ReviewOutcome, ReviewPreview};
use chrono::{DateTime, Utc};
use log::{debug, info};

/// Fractional days from `earlier` to `later`.
pub(crate) fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / DAY_MILLIS
}

fn whole_days(days: f64) -> u32 {
    // `f64::max` discards NaN and `as` saturates, so this never panics.
    days.max(1.0).ceil().min(f64::from(u32::MAX)) as u32
}

// --- Public Interface ---

/// Previews whether `item` is due at `now` and what its interval and ease
/// would become. Never mutates the item.
pub fn calculate_next_review(
    item: &Item,
    now: DateTime<Utc>,
    config: &IntervalConfig,
) -> ReviewPreview {
    let Some(last_reviewed) = item.last_reviewed else {
        return ReviewPreview {
            days_until_review: 0.0,
            new_interval: INITIAL_INTERVAL_DAYS,
            new_ease: config.default_ease,
        };
    };

    let days_since = days_between(last_reviewed, now);
    let interval = f64::from(item.review_interval);
    if days_since < interval {
        return ReviewPreview {
            days_until_review: interval - days_since,
            new_interval: item.review_interval,
            new_ease: item.review_ease,
        };
    }

    let new_ease = (item.review_ease + config.due_ease_bonus).min(config.max_ease);
    let base_interval = days_since * new_ease;
    let struggle_factor = (1.0 - f64::from(item.struggle_count) * config.struggle_interval_step)
        .max(config.min_struggle_factor);

    ReviewPreview {
        days_until_review: 0.0,
        new_interval: whole_days(base_interval * struggle_factor),
        new_ease,
    }
}

/// Applies a review outcome and returns the updated item. This is the only
/// path that changes scheduling or struggle fields; the caller persists the
/// result.
pub fn update_question_after_review(
    item: &Item,
    outcome: ReviewOutcome,
    now: DateTime<Utc>,
    config: &IntervalConfig,
) -> Item {
    let preview = calculate_next_review(item, now, config);
    let mut updated = item.clone();

    debug!(
        "[Interval Input] Item {}: Remembered: {}, Due: {}, Preview {}d @ {:.2}",
        item.id,
        outcome.remembered,
        preview.is_due(),
        preview.new_interval,
        preview.new_ease
    );

    let (interval, ease) = if outcome.remembered {
        let interval =
            whole_days(f64::from(preview.new_interval) * config.success_interval_multiplier);
        let ease = (preview.new_ease + config.success_ease_bonus).min(config.max_ease);
        (interval, ease)
    } else {
        // Penalty uses the struggle count from before this failure.
        let penalty = 1.0 + f64::from(item.struggle_count) * config.struggle_penalty_step;
        updated.struggle_count = item.struggle_count.saturating_add(1);
        updated.last_struggled_at = Some(now);
        updated.total_struggle_time += outcome.time_spent_seconds;

        let interval = whole_days(f64::from(preview.new_interval) / penalty);
        let ease = (preview.new_ease - config.failure_ease_step * penalty).max(config.min_ease);
        (interval, ease)
    };

    updated.last_reviewed = Some(now);
    updated.review_interval = interval;
    // `f64::clamp` panics on inverted or NaN bounds; unvalidated configs may have either.
    updated.review_ease = ease.max(config.min_ease).min(config.max_ease);
    updated.review_count = item.review_count.saturating_add(1);

    info!(
        "[Review Result] Item {}: Ease {:.2} -> {:.2}, Interval {}d -> {}d, Struggles {}",
        item.id,
        item.review_ease,
        updated.review_ease,
        item.review_interval,
        updated.review_interval,
        updated.struggle_count
    );

    updated
}
