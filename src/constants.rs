// src/constants.rs

// --- Time Constants ---
pub const DAY_MILLIS: f64 = 86_400_000.0;

// --- Interval Model ---
pub const INITIAL_INTERVAL_DAYS: u32 = 1;
pub const EASE_FACTOR_DEFAULT: f64 = 2.5;
pub const EASE_FACTOR_MIN: f64 = 1.3;
pub const EASE_FACTOR_MAX: f64 = 3.0;

// Adjustments
pub const EASE_FACTOR_INCREMENT_DUE: f64 = 0.1;
pub const EASE_FACTOR_INCREMENT_SUCCESS: f64 = 0.1;
pub const EASE_FACTOR_DECREMENT_FAIL: f64 = 0.2; // Scaled by the struggle penalty

// Interval Multipliers
pub const INTERVAL_MULTIPLIER_SUCCESS: f64 = 1.1;
pub const STRUGGLE_INTERVAL_STEP: f64 = 0.1; // Per prior struggle
pub const STRUGGLE_FACTOR_MIN: f64 = 0.5;
pub const STRUGGLE_PENALTY_STEP: f64 = 0.2; // Per prior struggle, on failure

// --- Struggle Weighting ---
pub const WEIGHT_EASE_FLOOR: f64 = 1.3;
pub const RECENCY_WINDOW_DAYS: f64 = 7.0;
pub const RECENCY_STEP: f64 = 0.2;
pub const STRUGGLE_TIME_SCALE: f64 = 1000.0;
pub const STRUGGLE_TIME_WEIGHT: f64 = 0.5;
pub const STRUGGLE_COUNT_WEIGHT: f64 = 2.0;

// --- Mode Thresholds ---
pub const REPEAT_EASE_THRESHOLD: f64 = 2.0;
pub const REPEAT_STRUGGLE_THRESHOLD: u32 = 3;
pub const STUDY_REVIEW_THRESHOLD: u32 = 3;

// --- Knowledge Gaps ---
pub const GAP_CORRECTNESS_THRESHOLD: f64 = 0.5;

// --- CLI ---
pub const DEFAULT_DB_PATH: &str = "review_engine.db";
