use serde::{Deserialize, Serialize};

use crate::encoder::StateKey;

/// One observed transition `(s, a, r, s', done)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: StateKey,
    pub action: String,
    pub reward: f64,
    pub next_state: StateKey,
    pub done: bool,
}

/// Transitions of a single episode, in the order they happened.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeTrace {
    pub episode: usize,
    pub transitions: Vec<Transition>,
}

impl EpisodeTrace {
    pub fn new(episode: usize) -> Self {
        Self {
            episode,
            transitions: Vec::new(),
        }
    }

    pub fn push(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn total_reward(&self) -> f64 {
        self.transitions.iter().map(|t| t.reward).sum()
    }
}
