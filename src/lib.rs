// src/lib.rs

pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod gaps;
pub mod interval;
pub mod models;
pub mod pedagogy;
pub mod repository;
pub mod selectors;
pub mod similarity;
pub mod struggle;

pub use config::SchedulerConfig;
pub use error::{Error, RankingError, Result};
pub use models::{
    AnswerRecord, GapReport, Item, ItemId, Mode, ReviewOutcome, ReviewPreview, SelectionContext,
    StudyQueues, TopicStats,
};
