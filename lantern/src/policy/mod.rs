//! Epsilon-greedy action selection over the commands a state offers.
mod errors;
mod schedule;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::encoder::StateKey;
use crate::table::QTable;

pub use errors::PolicyError;
pub use schedule::ExplorationSchedule;

/// Picks an action for `state`.
///
/// With probability `exploration_rate` a uniformly random candidate is
/// returned; otherwise one of the highest-valued candidates, chosen uniformly
/// among the tied maxima so the first listed command gets no advantage.
pub fn choose<S, R>(
    table: &QTable,
    state: StateKey,
    candidates: &[S],
    exploration_rate: f64,
    rng: &mut R,
) -> Result<String, PolicyError>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    if candidates.is_empty() {
        return Err(PolicyError::EmptyActionSet);
    }
    if rng.random::<f64>() < exploration_rate {
        return explore(candidates, rng);
    }
    greedy(table, state, candidates, rng)
}

/// Best-known action, ties broken at random.
pub fn greedy<S, R>(
    table: &QTable,
    state: StateKey,
    candidates: &[S],
    rng: &mut R,
) -> Result<String, PolicyError>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    table
        .best_actions(state, candidates)
        .choose(rng)
        .map(|a| a.to_string())
        .ok_or(PolicyError::EmptyActionSet)
}

/// Uniformly random action.
pub fn explore<S, R>(candidates: &[S], rng: &mut R) -> Result<String, PolicyError>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    candidates
        .choose(rng)
        .map(|a| a.as_ref().to_string())
        .ok_or(PolicyError::EmptyActionSet)
}
