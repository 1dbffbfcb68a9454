// src/selectors.rs

use crate::config::{ModeConfig, SchedulerConfig};
use crate::error::RankingError;
use crate::interval::calculate_next_review;
use crate::models::{Item, ItemId, Mode, SelectionContext, StudyQueues};
use crate::similarity::topic_similarity;
use crate::struggle::calculate_question_weight;
use chrono::{DateTime, Utc};
use log::debug;
use std::collections::{BTreeSet, HashSet};

// --- Repeat ---

/// Items that are due, hard, or repeatedly failed, heaviest struggle first.
/// Equal weights fall back to ascending item id.
pub fn select_repeat<'a>(
    items: &'a [Item],
    ease_threshold: f64,
    struggle_threshold: u32,
    now: DateTime<Utc>,
    config: &SchedulerConfig,
) -> Result<Vec<&'a Item>, RankingError> {
    let mut weighted: Vec<(f64, &Item)> = Vec::new();

    for item in items {
        let due = calculate_next_review(item, now, &config.interval).is_due();
        let hard = item.review_ease <= ease_threshold;
        let struggling = item.struggle_count >= struggle_threshold;
        if !(due || hard || struggling) {
            continue;
        }

        let weight = calculate_question_weight(item, now, &config.struggle);
        if !weight.is_finite() {
            return Err(RankingError::NonFiniteWeight {
                item_id: item.id.clone(),
                weight,
            });
        }
        debug!(
            "[Repeat] {}: weight {:.3} (due: {}, hard: {}, struggling: {})",
            item.id, weight, due, hard, struggling
        );
        weighted.push((weight, item));
    }

    weighted.sort_by(|(wa, a), (wb, b)| wb.total_cmp(wa).then_with(|| a.id.cmp(&b.id)));
    Ok(weighted.into_iter().map(|(_, item)| item).collect())
}

// --- Study ---

/// Never-reviewed items, and items reviewed at most `review_threshold` times,
/// each in input order. Anything reviewed more often is left out.
pub fn select_study(items: &[Item], review_threshold: u32) -> StudyQueues<'_> {
    let mut queues = StudyQueues::default();
    for item in items {
        match item.review_count {
            0 => queues.new_items.push(item),
            n if n <= review_threshold => queues.recent_items.push(item),
            _ => {}
        }
    }
    queues
}

// --- Discover ---

/// Topic-tagged items outside `exclude_ids` that either overlap the current
/// topics or came from an external generator, most similar first. Ties keep
/// input order, so zero-similarity generated items trail in the order given.
pub fn select_discover<'a>(
    items: &'a [Item],
    exclude_ids: &HashSet<ItemId>,
    current_topics: &BTreeSet<String>,
) -> Vec<&'a Item> {
    let mut scored: Vec<(f64, &Item)> = items
        .iter()
        .filter(|item| !exclude_ids.contains(&item.id) && !item.topics.is_empty())
        .map(|item| (topic_similarity(&item.topics, current_topics), item))
        .filter(|(similarity, item)| *similarity > 0.0 || item.is_externally_generated)
        .collect();

    // `sort_by` is stable.
    scored.sort_by(|(a, _), (b, _)| b.total_cmp(a));
    debug!(
        "[Discover] {} candidates for topics {:?}",
        scored.len(),
        current_topics
    );
    scored.into_iter().map(|(_, item)| item).collect()
}

// --- Polymorphic Selection ---

/// One ranking strategy with its parameters bound.
#[derive(Debug, Clone)]
pub enum Selector<'c> {
    Repeat {
        ease_threshold: f64,
        struggle_threshold: u32,
    },
    Study {
        review_threshold: u32,
    },
    Discover {
        exclude_ids: &'c HashSet<ItemId>,
        current_topics: &'c BTreeSet<String>,
    },
}

impl<'c> Selector<'c> {
    pub fn for_mode(mode: Mode, context: &'c SelectionContext, config: &ModeConfig) -> Self {
        match mode {
            Mode::Repeat => Selector::Repeat {
                ease_threshold: config.repeat_ease_threshold,
                struggle_threshold: config.repeat_struggle_threshold,
            },
            Mode::Study => Selector::Study {
                review_threshold: config.study_review_threshold,
            },
            Mode::Discover => Selector::Discover {
                exclude_ids: &context.exclude_ids,
                current_topics: &context.current_topics,
            },
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Selector::Repeat { .. } => Mode::Repeat,
            Selector::Study { .. } => Mode::Study,
            Selector::Discover { .. } => Mode::Discover,
        }
    }

    /// Ranks `items` into a single ordered queue.
    pub fn rank<'a>(
        &self,
        items: &'a [Item],
        now: DateTime<Utc>,
        config: &SchedulerConfig,
    ) -> Result<Vec<&'a Item>, RankingError> {
        match self {
            Selector::Repeat {
                ease_threshold,
                struggle_threshold,
            } => select_repeat(items, *ease_threshold, *struggle_threshold, now, config),
            Selector::Study { review_threshold } => {
                Ok(select_study(items, *review_threshold).into_ordered())
            }
            Selector::Discover {
                exclude_ids,
                current_topics,
            } => Ok(select_discover(items, exclude_ids, current_topics)),
        }
    }
}
