//! Per-episode bookkeeping for a training run.
mod window;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use window::TrailingWindow;

/// Why an episode stopped before the game said it was over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationReason {
    /// `max_steps_per_episode` reached.
    StepBudget,
    /// The state offered no commands.
    EmptyActions,
    /// The game backend raised an error.
    EnvFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeOutcome {
    Done,
    Truncated(TruncationReason),
}

impl EpisodeOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, EpisodeOutcome::Done)
    }

    pub fn is_truncated(&self) -> bool {
        !self.is_done()
    }
}

impl fmt::Display for EpisodeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodeOutcome::Done => f.write_str("done"),
            EpisodeOutcome::Truncated(TruncationReason::StepBudget) => {
                f.write_str("truncated (step budget)")
            }
            EpisodeOutcome::Truncated(TruncationReason::EmptyActions) => {
                f.write_str("truncated (no actions)")
            }
            EpisodeOutcome::Truncated(TruncationReason::EnvFailure) => {
                f.write_str("truncated (environment error)")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    pub total_reward: f64,
    pub steps: usize,
    pub outcome: EpisodeOutcome,
    /// Final in-game score when the game reports one.
    pub score: Option<f64>,
}

/// Aggregates over a run. Means and variances cover the trailing window; the
/// counts cover every recorded episode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub episodes: usize,
    pub done: usize,
    pub truncated: usize,
    pub total_steps: u64,
    pub window: usize,
    pub mean_reward: f64,
    pub reward_variance: f64,
    pub mean_steps: f64,
    pub steps_variance: f64,
    pub best_reward: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub episode: usize,
    pub stats: EpisodeStats,
}

/// Append-only log of episode statistics.
#[derive(Debug, Clone)]
pub struct Recorder {
    records: Vec<EpisodeRecord>,
    rewards: TrailingWindow,
    steps: TrailingWindow,
    done: usize,
    total_steps: u64,
    best_reward: Option<f64>,
}

impl Recorder {
    pub fn new(window_size: usize) -> Self {
        Self {
            records: Vec::new(),
            rewards: TrailingWindow::new(window_size),
            steps: TrailingWindow::new(window_size),
            done: 0,
            total_steps: 0,
            best_reward: None,
        }
    }

    pub fn record(&mut self, episode: usize, stats: EpisodeStats) {
        self.rewards.push(stats.total_reward);
        self.steps.push(stats.steps as f64);
        if stats.outcome.is_done() {
            self.done += 1;
        }
        self.total_steps += stats.steps as u64;
        self.best_reward = Some(match self.best_reward {
            Some(best) => best.max(stats.total_reward),
            None => stats.total_reward,
        });
        self.records.push(EpisodeRecord { episode, stats });
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            episodes: self.records.len(),
            done: self.done,
            truncated: self.records.len() - self.done,
            total_steps: self.total_steps,
            window: self.rewards.len(),
            mean_reward: self.rewards.mean(),
            reward_variance: self.rewards.variance(),
            mean_steps: self.steps.mean(),
            steps_variance: self.steps.variance(),
            best_reward: self.best_reward,
        }
    }

    pub fn records(&self) -> &[EpisodeRecord] {
        &self.records
    }

    pub fn get(&self, episode: usize) -> Option<&EpisodeStats> {
        self.records
            .iter()
            .find(|r| r.episode == episode)
            .map(|r| &r.stats)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new(100)
    }
}
