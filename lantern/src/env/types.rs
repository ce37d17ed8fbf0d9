use serde::{Deserialize, Serialize};

/// What the game reports back after one command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub observation: String,
    pub reward: f64,
    pub done: bool,
}

impl StepResult {
    pub fn new(observation: impl Into<String>, reward: f64, done: bool) -> Self {
        Self {
            observation: observation.into(),
            reward,
            done,
        }
    }
}
