// src/gaps.rs

use crate::config::GapConfig;
use crate::models::{AnswerRecord, GapReport, ItemId, TopicStats};
use log::{debug, info};
use std::collections::{BTreeMap, HashMap};

/// Per-topic correctness over a batch of answers. Every topic in the result
/// has `total_count >= 1`.
pub fn topic_performance(
    performance: &HashMap<ItemId, AnswerRecord>,
) -> BTreeMap<String, TopicStats> {
    let mut stats: BTreeMap<String, TopicStats> = BTreeMap::new();
    for record in performance.values() {
        for topic in &record.topics {
            let entry = stats.entry(topic.clone()).or_default();
            entry.total_count += 1;
            if record.correct {
                entry.correct_count += 1;
            }
        }
    }
    stats
}

/// Flags topics answered correctly less often than the configured threshold,
/// together with every item that exercises one of them.
pub fn analyze_knowledge_gaps(
    performance: &HashMap<ItemId, AnswerRecord>,
    config: &GapConfig,
) -> GapReport {
    let mut report = GapReport::default();

    for (topic, stats) in topic_performance(performance) {
        let correctness = stats.correctness();
        debug!(
            "[Gaps] {}: {}/{} correct ({:.2})",
            topic, stats.correct_count, stats.total_count, correctness
        );
        if correctness < config.gap_threshold {
            report.gaps.insert(topic);
        }
    }

    for (item_id, record) in performance {
        if record.topics.iter().any(|topic| report.gaps.contains(topic)) {
            report.related_item_ids.insert(item_id.clone());
        }
    }

    info!(
        "[Gaps] {} weak topics across {} related items",
        report.gaps.len(),
        report.related_item_ids.len()
    );
    report
}
