// src/config.rs

use crate::constants::*;
use crate::error::{Error, Result};
use log::debug;
use serde::Deserialize;
use std::path::Path;

/// Every tunable coefficient of the scheduler. Missing sections or keys in a
/// TOML file fall back to the defaults in `constants`.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SchedulerConfig {
    pub interval: IntervalConfig,
    pub struggle: StruggleConfig,
    pub modes: ModeConfig,
    pub gaps: GapConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct IntervalConfig {
    pub default_ease: f64,
    pub min_ease: f64,
    pub max_ease: f64,
    /// Ease gained when a due item is previewed.
    pub due_ease_bonus: f64,
    pub struggle_interval_step: f64,
    pub min_struggle_factor: f64,
    pub struggle_penalty_step: f64,
    pub failure_ease_step: f64,
    pub success_interval_multiplier: f64,
    pub success_ease_bonus: f64,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            default_ease: EASE_FACTOR_DEFAULT,
            min_ease: EASE_FACTOR_MIN,
            max_ease: EASE_FACTOR_MAX,
            due_ease_bonus: EASE_FACTOR_INCREMENT_DUE,
            struggle_interval_step: STRUGGLE_INTERVAL_STEP,
            min_struggle_factor: STRUGGLE_FACTOR_MIN,
            struggle_penalty_step: STRUGGLE_PENALTY_STEP,
            failure_ease_step: EASE_FACTOR_DECREMENT_FAIL,
            success_interval_multiplier: INTERVAL_MULTIPLIER_SUCCESS,
            success_ease_bonus: EASE_FACTOR_INCREMENT_SUCCESS,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StruggleConfig {
    pub ease_floor: f64,
    pub recency_window_days: f64,
    pub recency_step: f64,
    pub time_scale: f64,
    pub time_weight: f64,
    pub count_weight: f64,
}

impl Default for StruggleConfig {
    fn default() -> Self {
        Self {
            ease_floor: WEIGHT_EASE_FLOOR,
            recency_window_days: RECENCY_WINDOW_DAYS,
            recency_step: RECENCY_STEP,
            time_scale: STRUGGLE_TIME_SCALE,
            time_weight: STRUGGLE_TIME_WEIGHT,
            count_weight: STRUGGLE_COUNT_WEIGHT,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ModeConfig {
    pub repeat_ease_threshold: f64,
    pub repeat_struggle_threshold: u32,
    pub study_review_threshold: u32,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            repeat_ease_threshold: REPEAT_EASE_THRESHOLD,
            repeat_struggle_threshold: REPEAT_STRUGGLE_THRESHOLD,
            study_review_threshold: STUDY_REVIEW_THRESHOLD,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GapConfig {
    /// Topics answered correctly less often than this are gaps.
    pub gap_threshold: f64,
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            gap_threshold: GAP_CORRECTNESS_THRESHOLD,
        }
    }
}

impl SchedulerConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: SchedulerConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        debug!("[Config] Loading {:?}", path);
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        let i = &self.interval;
        let s = &self.struggle;
        let coefficients = [
            ("interval.default_ease", i.default_ease),
            ("interval.min_ease", i.min_ease),
            ("interval.max_ease", i.max_ease),
            ("interval.due_ease_bonus", i.due_ease_bonus),
            ("interval.struggle_interval_step", i.struggle_interval_step),
            ("interval.min_struggle_factor", i.min_struggle_factor),
            ("interval.struggle_penalty_step", i.struggle_penalty_step),
            ("interval.failure_ease_step", i.failure_ease_step),
            ("interval.success_interval_multiplier", i.success_interval_multiplier),
            ("interval.success_ease_bonus", i.success_ease_bonus),
            ("struggle.ease_floor", s.ease_floor),
            ("struggle.recency_window_days", s.recency_window_days),
            ("struggle.recency_step", s.recency_step),
            ("struggle.time_scale", s.time_scale),
            ("struggle.time_weight", s.time_weight),
            ("struggle.count_weight", s.count_weight),
            ("modes.repeat_ease_threshold", self.modes.repeat_ease_threshold),
            ("gaps.gap_threshold", self.gaps.gap_threshold),
        ];
        // Every coefficient is a non-negative magnitude.
        for (key, value) in coefficients {
            if !value.is_finite() || value < 0.0 {
                return invalid(&format!("{key} must be a finite, non-negative number"));
            }
        }

        if i.min_ease <= 0.0 {
            return invalid("interval.min_ease must be positive");
        }
        if i.min_ease > i.max_ease {
            return invalid("interval.min_ease must not exceed interval.max_ease");
        }
        if !(i.min_ease..=i.max_ease).contains(&i.default_ease) {
            return invalid("interval.default_ease must lie within [min_ease, max_ease]");
        }
        if i.min_struggle_factor <= 0.0 || i.min_struggle_factor > 1.0 {
            return invalid("interval.min_struggle_factor must lie within (0, 1]");
        }
        if i.success_interval_multiplier < 1.0 {
            return invalid("interval.success_interval_multiplier must be at least 1");
        }
        if s.time_scale <= 0.0 {
            return invalid("struggle.time_scale must be positive");
        }
        if self.gaps.gap_threshold > 1.0 {
            return invalid("gaps.gap_threshold must lie within [0, 1]");
        }
        Ok(())
    }
}

fn invalid(message: &str) -> Result<()> {
    Err(Error::InvalidConfig(message.to_string()))
}
