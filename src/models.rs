// src/models.rs

use crate::constants::*;
use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

pub type ItemId = String;

// --- Data Models ---

/// A reviewable question or flashcard, as loaded from the item store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_reviewed: Option<DateTime<Utc>>,
    /// Days; meaningful only once `last_reviewed` is set.
    #[serde(default = "default_interval")]
    pub review_interval: u32,
    #[serde(default = "default_ease")]
    pub review_ease: f64,
    #[serde(default)]
    pub struggle_count: u32,
    #[serde(default)]
    pub last_struggled_at: Option<DateTime<Utc>>,
    /// Seconds spent on failed attempts.
    #[serde(default)]
    pub total_struggle_time: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub topics: BTreeSet<String>,
    #[serde(default)]
    pub is_externally_generated: bool,
}

fn default_interval() -> u32 {
    INITIAL_INTERVAL_DAYS
}

fn default_ease() -> f64 {
    EASE_FACTOR_DEFAULT
}

impl Item {
    /// A fresh item with no review history.
    pub fn new(id: impl Into<ItemId>, created_at: DateTime<Utc>) -> Self {
        Item {
            id: id.into(),
            created_at,
            last_reviewed: None,
            review_interval: INITIAL_INTERVAL_DAYS,
            review_ease: EASE_FACTOR_DEFAULT,
            struggle_count: 0,
            last_struggled_at: None,
            total_struggle_time: 0.0,
            review_count: 0,
            topics: BTreeSet::new(),
            is_externally_generated: false,
        }
    }

    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }
}

/// What the user did with an item after it was shown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewOutcome {
    pub remembered: bool,
    pub time_spent_seconds: f64,
}

impl ReviewOutcome {
    pub fn remembered() -> Self {
        ReviewOutcome {
            remembered: true,
            time_spent_seconds: 0.0,
        }
    }

    pub fn forgot() -> Self {
        ReviewOutcome {
            remembered: false,
            time_spent_seconds: 0.0,
        }
    }

    pub fn with_time_spent(mut self, seconds: f64) -> Self {
        self.time_spent_seconds = seconds;
        self
    }

    /// Time spent feeds `total_struggle_time`, which must stay finite and
    /// non-negative for Repeat weights to be computable.
    pub fn validate(&self) -> Result<(), Error> {
        if self.time_spent_seconds.is_finite() && self.time_spent_seconds >= 0.0 {
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!(
                "time spent must be a finite, non-negative number of seconds, got {}",
                self.time_spent_seconds
            )))
        }
    }
}

/// Side-effect-free look at an item's next scheduling state.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPreview {
    /// Zero when the item is due now.
    pub days_until_review: f64,
    pub new_interval: u32,
    pub new_ease: f64,
}

impl ReviewPreview {
    pub fn is_due(&self) -> bool {
        self.days_until_review == 0.0
    }
}

// --- Modes ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Repeat,
    Study,
    Discover,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Repeat, Mode::Study, Mode::Discover];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Repeat => "repeat",
            Mode::Study => "study",
            Mode::Discover => "discover",
        }
    }
}

impl FromStr for Mode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "repeat" => Ok(Mode::Repeat),
            "study" => Ok(Mode::Study),
            "discover" => Ok(Mode::Discover),
            _ => Err(Error::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied context for a scheduling decision. Only Discover reads it.
#[derive(Debug, Clone, Default)]
pub struct SelectionContext {
    pub exclude_ids: HashSet<ItemId>,
    pub current_topics: BTreeSet<String>,
}

impl SelectionContext {
    pub fn new<E, T>(exclude_ids: E, current_topics: T) -> Self
    where
        E: IntoIterator,
        E::Item: Into<ItemId>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        SelectionContext {
            exclude_ids: exclude_ids.into_iter().map(Into::into).collect(),
            current_topics: current_topics.into_iter().map(Into::into).collect(),
        }
    }
}

/// Study mode's two queues, before flattening.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudyQueues<'a> {
    pub new_items: Vec<&'a Item>,
    pub recent_items: Vec<&'a Item>,
}

impl<'a> StudyQueues<'a> {
    /// New items first, then recently introduced ones.
    pub fn into_ordered(self) -> Vec<&'a Item> {
        let mut ordered = self.new_items;
        ordered.extend(self.recent_items);
        ordered
    }
}

// --- Knowledge Gaps ---

/// One answered item, as fed to gap analysis.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnswerRecord {
    pub correct: bool,
    #[serde(default)]
    pub topics: BTreeSet<String>,
}

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TopicStats {
    pub correct_count: u32,
    pub total_count: u32,
}

impl TopicStats {
    pub fn correctness(&self) -> f64 {
        f64::from(self.correct_count) / f64::from(self.total_count)
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GapReport {
    pub gaps: BTreeSet<String>,
    pub related_item_ids: BTreeSet<ItemId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_names_parse_case_insensitively() {
        assert_eq!("repeat".parse::<Mode>().unwrap(), Mode::Repeat);
        assert_eq!(" Study ".parse::<Mode>().unwrap(), Mode::Study);
        assert_eq!("DISCOVER".parse::<Mode>().unwrap(), Mode::Discover);
        for mode in Mode::ALL {
            assert_eq!(mode.as_str().parse::<Mode>().unwrap(), mode);
        }
    }

    #[test]
    fn unknown_mode_is_an_error() {
        let err = "bogus".parse::<Mode>().unwrap_err();
        assert!(matches!(err, Error::InvalidMode(ref m) if m == "bogus"));
    }

    #[test]
    fn review_time_must_be_finite_and_non_negative() {
        assert!(ReviewOutcome::forgot().with_time_spent(0.0).validate().is_ok());
        assert!(ReviewOutcome::remembered().with_time_spent(42.5).validate().is_ok());
        for seconds in [-2000.0, -0.5, f64::NAN, f64::INFINITY] {
            let err = ReviewOutcome::forgot()
                .with_time_spent(seconds)
                .validate()
                .unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "accepted {seconds}");
        }
    }

    #[test]
    fn item_json_fills_scheduling_defaults() {
        let item: Item = serde_json::from_str(
            r#"{"id": "q1", "createdAt": "2024-03-01T12:00:00Z", "topics": ["math", "math"]}"#,
        )
        .unwrap();
        assert_eq!(item.review_interval, 1);
        assert_eq!(item.review_ease, 2.5);
        assert_eq!(item.review_count, 0);
        assert!(item.last_reviewed.is_none());
        assert_eq!(item.topics.len(), 1);
        assert!(!item.is_externally_generated);
    }

    #[test]
    fn study_queues_flatten_new_before_recent() {
        let now = DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let a = Item::new("a", now);
        let b = Item::new("b", now);
        let queues = StudyQueues {
            new_items: vec![&b],
            recent_items: vec![&a],
        };
        let ids: Vec<&str> = queues.into_ordered().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
