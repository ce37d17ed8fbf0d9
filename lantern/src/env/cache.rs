use std::collections::HashMap;

use super::{EnvError, TextEnv};
use crate::encoder::StateKey;

/// Memoizes `valid_actions` per state key.
///
/// Asking an interactive-fiction interpreter for its valid commands is slow
/// (it tries every template against a saved world state), so each state is
/// asked once. When the game offers nothing the configured fallback commands
/// are used instead; an empty fallback lets the empty set through.
#[derive(Debug, Clone, Default)]
pub struct ValidActionCache {
    entries: HashMap<StateKey, Vec<String>>,
    fallback: Vec<String>,
    enabled: bool,
    hits: u64,
    misses: u64,
}

impl ValidActionCache {
    pub fn new(fallback: Vec<String>, enabled: bool) -> Self {
        Self {
            entries: HashMap::new(),
            fallback,
            enabled,
            hits: 0,
            misses: 0,
        }
    }

    pub fn actions_for<T>(
        &mut self,
        env: &mut T,
        state: StateKey,
        observation: &str,
    ) -> Result<Vec<String>, EnvError>
    where
        T: TextEnv + ?Sized,
    {
        if self.enabled {
            if let Some(actions) = self.entries.get(&state) {
                self.hits += 1;
                return Ok(actions.clone());
            }
        }
        self.misses += 1;

        let mut actions = env.valid_actions(observation)?;
        if actions.is_empty() && !self.fallback.is_empty() {
            tracing::debug!(state = %state, "no valid actions reported, using fallback commands");
            actions = self.fallback.clone();
        }

        if self.enabled {
            self.entries.insert(state, actions.clone());
        }
        Ok(actions)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
