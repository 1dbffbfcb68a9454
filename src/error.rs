// src/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid mode {0:?}: expected one of repeat, study, discover")]
    InvalidMode(String),

    #[error("item not found: {0}")]
    ItemNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A selector could not produce a trustworthy ordering.
///
/// The dispatcher never propagates these: it logs them and serves an empty
/// queue instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankingError {
    #[error("item {item_id} has a non-finite struggle weight ({weight})")]
    NonFiniteWeight { item_id: String, weight: f64 },
}
