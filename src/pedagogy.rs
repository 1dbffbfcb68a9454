// src/pedagogy.rs

use crate::config::SchedulerConfig;
use crate::error::Result;
use crate::models::{Item, Mode, SelectionContext};
use crate::selectors::Selector;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};

// --- Public Interface ---

/// Entry point for callers that name the mode as a string.
///
/// An unknown mode name is a caller bug and fails with `Error::InvalidMode`.
/// Ranking failures inside a selector do not propagate; they degrade to an
/// empty queue.
pub fn questions_by_mode<'a>(
    mode: &str,
    items: &'a [Item],
    context: &SelectionContext,
    now: DateTime<Utc>,
    config: &SchedulerConfig,
) -> Result<Vec<&'a Item>> {
    let mode: Mode = mode.parse().inspect_err(|e| warn!("[Dispatch] Rejected: {}", e))?;
    Ok(select_for_mode(mode, items, context, now, config))
}

/// Runs the selector for `mode`. An empty result means nothing is
/// schedulable right now, not that the population is empty.
pub fn select_for_mode<'a>(
    mode: Mode,
    items: &'a [Item],
    context: &SelectionContext,
    now: DateTime<Utc>,
    config: &SchedulerConfig,
) -> Vec<&'a Item> {
    debug!(
        "[Dispatch] Mode {} over {} items (excluding {}, topics {:?})",
        mode,
        items.len(),
        context.exclude_ids.len(),
        context.current_topics
    );

    match Selector::for_mode(mode, context, &config.modes).rank(items, now, config) {
        Ok(queue) => {
            info!("[Dispatch] Mode {}: {} items queued", mode, queue.len());
            queue
        }
        Err(e) => {
            warn!("[Dispatch] Mode {} failed, serving nothing: {}", mode, e);
            Vec::new()
        }
    }
}
