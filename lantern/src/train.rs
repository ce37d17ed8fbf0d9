// lantern/src/train.rs
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::config::RunConfig;
use crate::env::TextEnv;
use crate::error::Error;
use crate::learner::QLearner;
use crate::metrics::RunSummary;
use crate::table::QTable;

#[derive(Debug, Clone)]
pub struct TrainingStats {
    pub run_id: Uuid,
    pub total_steps: u64,
    pub total_episodes: u64,
    pub training_time: Duration,
    pub summary: RunSummary,
}

/// Validates `cfg`, trains a fresh table for `cfg.max_episodes` episodes and
/// hands the table back.
///
/// Bad hyperparameters fail here before any episode runs. Game errors during
/// training only truncate the episode they happen in.
pub fn train<T: TextEnv + ?Sized>(
    env: &mut T,
    cfg: RunConfig,
) -> Result<(QTable, TrainingStats), Error> {
    let mut learner = QLearner::new(cfg)?;
    let started = Instant::now();
    let summary = learner.train(env);

    let stats = TrainingStats {
        run_id: learner.run_id(),
        total_steps: summary.total_steps,
        total_episodes: summary.episodes as u64,
        training_time: started.elapsed(),
        summary,
    };
    Ok((learner.into_table(), stats))
}
