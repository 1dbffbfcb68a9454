// src/similarity.rs

use std::collections::BTreeSet;

/// Share of topics two tag sets have in common, normalised by the larger
/// set. Zero when either set is empty.
pub fn topic_similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let larger = a.len().max(b.len());
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(b).count();
    shared as f64 / larger as f64
}
