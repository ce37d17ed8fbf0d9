// lantern/src/config.rs
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encoder::EncoderKind;
use crate::policy::ExplorationSchedule;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("learning_rate must be in (0, 1], got {0}")]
    LearningRate(f64),

    #[error("discount_factor must be in [0, 1], got {0}")]
    DiscountFactor(f64),

    #[error("exploration_start must be in [0, 1], got {0}")]
    ExplorationStart(f64),

    #[error("exploration_floor must be in [0, exploration_start = {start}], got {floor}")]
    ExplorationFloor { floor: f64, start: f64 },

    #[error("exponential exploration decay rate must be in (0, 1], got {0}")]
    DecayRate(f64),

    #[error("max_steps_per_episode must be at least 1")]
    StepBudget,

    #[error("summary_window must be at least 1")]
    SummaryWindow,

    #[error("default_value must be finite, got {0}")]
    DefaultValue(f64),

    #[error("invalid value {value:?} for {key}")]
    Override { key: String, value: String },

    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Hyperparameters and limits for one training run.
///
/// Missing fields in a config file take the defaults below; unknown fields
/// are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Step size of the TD update, in (0, 1].
    pub learning_rate: f64,
    /// Weight of future value, in [0, 1].
    pub discount_factor: f64,
    pub exploration_start: f64,
    pub exploration_floor: f64,
    pub exploration_decay: ExplorationSchedule,
    pub max_episodes: usize,
    pub max_steps_per_episode: usize,

    /// Value of never-visited `(state, action)` pairs.
    pub default_value: f64,
    /// Seed for exploration; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Trailing window for summary means and variances.
    pub summary_window: usize,
    /// Episodes between progress log lines, 0 to disable.
    pub log_interval: usize,
    /// Return each episode's transitions alongside its statistics.
    pub keep_traces: bool,
    /// Commands tried when the game reports none (directions by default).
    pub default_actions: Vec<String>,
    pub cache_valid_actions: bool,
    pub encoder: EncoderKind,
    /// Number of recent actions folded into state keys, 0 for none.
    pub history_window: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1.0,
            discount_factor: 0.999,
            exploration_start: 0.1,
            exploration_floor: 0.0,
            exploration_decay: ExplorationSchedule::Constant,
            max_episodes: 1000,
            max_steps_per_episode: 500,
            default_value: 0.0,
            seed: None,
            summary_window: 100,
            log_interval: 100,
            keep_traces: false,
            default_actions: ["n", "s", "e", "w"].iter().map(|s| s.to_string()).collect(),
            cache_valid_actions: true,
            encoder: EncoderKind::Normalized,
            history_window: 0,
        }
    }
}

impl RunConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Applies `LANTERN_*` environment variables on top of this config.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up by variable name, e.g.
    /// `LANTERN_LEARNING_RATE`. Unset names leave the field alone.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        override_field(&lookup, "LANTERN_LEARNING_RATE", &mut self.learning_rate)?;
        override_field(&lookup, "LANTERN_DISCOUNT_FACTOR", &mut self.discount_factor)?;
        override_field(&lookup, "LANTERN_EXPLORATION_START", &mut self.exploration_start)?;
        override_field(&lookup, "LANTERN_EXPLORATION_FLOOR", &mut self.exploration_floor)?;
        override_field(&lookup, "LANTERN_MAX_EPISODES", &mut self.max_episodes)?;
        override_field(&lookup, "LANTERN_MAX_STEPS", &mut self.max_steps_per_episode)?;
        override_field(&lookup, "LANTERN_LOG_INTERVAL", &mut self.log_interval)?;
        override_field(&lookup, "LANTERN_HISTORY_WINDOW", &mut self.history_window)?;
        if let Some(value) = lookup("LANTERN_SEED") {
            let seed = value.trim().parse().map_err(|_| ConfigError::Override {
                key: "LANTERN_SEED".to_string(),
                value: value.clone(),
            })?;
            self.seed = Some(seed);
        }
        Ok(self)
    }

    /// Checks every hyperparameter. Run once before the first episode.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(ConfigError::LearningRate(self.learning_rate));
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(ConfigError::DiscountFactor(self.discount_factor));
        }
        if !(0.0..=1.0).contains(&self.exploration_start) {
            return Err(ConfigError::ExplorationStart(self.exploration_start));
        }
        if !(0.0..=self.exploration_start).contains(&self.exploration_floor) {
            return Err(ConfigError::ExplorationFloor {
                floor: self.exploration_floor,
                start: self.exploration_start,
            });
        }
        if let ExplorationSchedule::Exponential { rate } = self.exploration_decay {
            if !(rate > 0.0 && rate <= 1.0) {
                return Err(ConfigError::DecayRate(rate));
            }
        }
        if self.max_steps_per_episode == 0 {
            return Err(ConfigError::StepBudget);
        }
        if self.summary_window == 0 {
            return Err(ConfigError::SummaryWindow);
        }
        if !self.default_value.is_finite() {
            return Err(ConfigError::DefaultValue(self.default_value));
        }
        Ok(())
    }

    /// Exploration rate for the zero-based `episode` of this run.
    pub fn exploration_rate(&self, episode: usize) -> f64 {
        self.exploration_decay
            .rate(self.exploration_start, self.exploration_floor, episode)
    }
}

fn override_field<F, T>(lookup: &F, key: &str, field: &mut T) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(value) = lookup(key) {
        *field = value.trim().parse().map_err(|_| ConfigError::Override {
            key: key.to_string(),
            value: value.clone(),
        })?;
    }
    Ok(())
}
