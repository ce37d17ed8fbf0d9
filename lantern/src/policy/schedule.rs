use serde::{Deserialize, Serialize};

/// How the exploration rate moves from `exploration_start` toward
/// `exploration_floor` as episodes go by.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExplorationSchedule {
    /// Stay at the start rate.
    #[default]
    Constant,
    /// Straight line from start to floor over `episodes` episodes.
    Linear { episodes: usize },
    /// `start * rate^episode`, never below the floor.
    Exponential { rate: f64 },
}

impl ExplorationSchedule {
    /// Exploration rate for the zero-based `episode`, always within
    /// `[floor, start]`.
    pub fn rate(&self, start: f64, floor: f64, episode: usize) -> f64 {
        let raw = match *self {
            ExplorationSchedule::Constant => start,
            ExplorationSchedule::Linear { episodes } => {
                if episode >= episodes {
                    floor
                } else {
                    let progress = episode as f64 / episodes as f64;
                    start + (floor - start) * progress
                }
            }
            ExplorationSchedule::Exponential { rate } => start * rate.powf(episode as f64),
        };
        raw.min(start).max(floor)
    }
}
