use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::QLearner;
use super::errors::PlayError;
use crate::encoder::StateEncoder;
use crate::env::TextEnv;
use crate::metrics::{EpisodeOutcome, EpisodeStats, TruncationReason};
use crate::policy::{self, PolicyError};

/// How commands are picked when playing without learning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayMode {
    /// Highest-valued command, ties broken at random.
    Greedy,
    /// Uniformly random valid command.
    Random,
    /// The game's own solution, replayed in order.
    Walkthrough,
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayMode::Greedy => f.write_str("greedy"),
            PlayMode::Random => f.write_str("random"),
            PlayMode::Walkthrough => f.write_str("walkthrough"),
        }
    }
}

impl FromStr for PlayMode {
    type Err = PlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" | "agent" => Ok(PlayMode::Greedy),
            "random" => Ok(PlayMode::Random),
            "walkthrough" => Ok(PlayMode::Walkthrough),
            _ => Err(PlayError::UnknownMode(s.to_string())),
        }
    }
}

/// Scores of several played games.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub mode: PlayMode,
    pub games: usize,
    pub mean_score: f64,
    pub scores: Vec<f64>,
}

impl<E: StateEncoder> QLearner<E> {
    /// Plays one game without touching the table or the recorder.
    ///
    /// Environment errors are returned rather than absorbed.
    pub fn play_episode<T: TextEnv + ?Sized>(
        &mut self,
        env: &mut T,
        mode: PlayMode,
        max_steps: usize,
    ) -> Result<EpisodeStats, PlayError> {
        let mut walkthrough = match mode {
            PlayMode::Walkthrough => {
                Some(env.walkthrough().ok_or(PlayError::NoWalkthrough)?.into_iter())
            }
            PlayMode::Greedy | PlayMode::Random => None,
        };

        let mut history = VecDeque::new();
        let mut observation = env.reset()?;
        let mut total_reward = 0.0;
        let mut steps = 0;

        let outcome = loop {
            if steps >= max_steps {
                break EpisodeOutcome::Truncated(TruncationReason::StepBudget);
            }

            let action = match walkthrough.as_mut() {
                Some(commands) => match commands.next() {
                    Some(command) => command,
                    None => break EpisodeOutcome::Truncated(TruncationReason::EmptyActions),
                },
                None => {
                    let state = self.encode(env, &observation, &history);
                    let actions = self.cache.actions_for(env, state, &observation)?;
                    let choice = if mode == PlayMode::Random {
                        policy::explore(&actions, &mut self.rng)
                    } else {
                        policy::greedy(&self.table, state, &actions, &mut self.rng)
                    };
                    match choice {
                        Ok(action) => action,
                        Err(PolicyError::EmptyActionSet) => {
                            break EpisodeOutcome::Truncated(TruncationReason::EmptyActions);
                        }
                    }
                }
            };

            let result = env.step(&action)?;
            steps += 1;
            total_reward += result.reward;
            debug!(mode = %mode, step = steps, action = %action, reward = result.reward, "play step");
            self.remember(&mut history, &action);

            if result.done {
                break EpisodeOutcome::Done;
            }
            observation = result.observation;
        };

        Ok(EpisodeStats {
            total_reward,
            steps,
            outcome,
            score: env.score(),
        })
    }

    /// Plays `games` games and averages their scores. A game's score is the
    /// in-game score when reported, its total reward otherwise.
    pub fn evaluate<T: TextEnv + ?Sized>(
        &mut self,
        env: &mut T,
        mode: PlayMode,
        games: usize,
        max_steps: usize,
    ) -> Result<Evaluation, PlayError> {
        let mut scores = Vec::with_capacity(games);
        for _ in 0..games {
            let stats = self.play_episode(env, mode, max_steps)?;
            scores.push(stats.score.unwrap_or(stats.total_reward));
        }

        let mean_score = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };
        info!(mode = %mode, games, mean_score, "evaluation finished");

        Ok(Evaluation {
            mode,
            games,
            mean_score,
            scores,
        })
    }
}
