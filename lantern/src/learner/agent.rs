use std::collections::VecDeque;
use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::trace::{EpisodeTrace, Transition};
use crate::config::{ConfigError, RunConfig};
use crate::encoder::{EncodeContext, StateEncoder, StateKey};
use crate::env::{EnvError, TextEnv, ValidActionCache};
use crate::metrics::{EpisodeOutcome, EpisodeStats, Recorder, RunSummary, TruncationReason};
use crate::policy::{self, PolicyError};
use crate::table::QTable;

pub type BoxedEncoder = Box<dyn StateEncoder + Send + Sync>;

/// Result of one training episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeReport {
    pub episode: usize,
    pub stats: EpisodeStats,
    /// Present when `keep_traces` is set.
    pub trace: Option<EpisodeTrace>,
}

/// A tabular Q-learning agent and everything one run owns: the table, the
/// exploration RNG, the valid-action cache and the episode recorder.
///
/// Nothing is global, so independent learners can run side by side.
pub struct QLearner<E = BoxedEncoder> {
    config: RunConfig,
    encoder: E,
    pub(super) table: QTable,
    pub(super) cache: ValidActionCache,
    recorder: Recorder,
    pub(super) rng: StdRng,
    run_id: Uuid,
    episodes_run: usize,
}

// Manual Debug implementation - encoders are usually boxed trait objects
impl<E> fmt::Debug for QLearner<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QLearner")
            .field("run_id", &self.run_id)
            .field("episodes_run", &self.episodes_run)
            .field("table_entries", &self.table.len())
            .field("encoder", &std::any::type_name::<E>())
            .finish()
    }
}

impl QLearner {
    /// Builds a learner with the encoder named in `config`.
    pub fn new(config: RunConfig) -> Result<Self, ConfigError> {
        let encoder = config.encoder.build(config.history_window);
        Self::with_encoder(config, encoder)
    }
}

impl<E: StateEncoder> QLearner<E> {
    pub fn with_encoder(config: RunConfig, encoder: E) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            table: QTable::new(config.default_value),
            cache: ValidActionCache::new(
                config.default_actions.clone(),
                config.cache_valid_actions,
            ),
            recorder: Recorder::new(config.summary_window),
            rng,
            encoder,
            run_id: Uuid::new_v4(),
            episodes_run: 0,
            config,
        })
    }

    /// Continues from a previously learned table.
    pub fn with_table(mut self, table: QTable) -> Self {
        self.table = table;
        self
    }

    /// Swaps in `table` and returns the one learned so far.
    pub fn replace_table(&mut self, table: QTable) -> QTable {
        std::mem::replace(&mut self.table, table)
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn into_table(self) -> QTable {
        self.table
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn summary(&self) -> RunSummary {
        self.recorder.summary()
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn episodes_run(&self) -> usize {
        self.episodes_run
    }

    /// Exploration rate the next episode will use.
    pub fn exploration_rate(&self) -> f64 {
        self.config.exploration_rate(self.episodes_run)
    }

    /// Runs `max_episodes` training episodes.
    pub fn train<T: TextEnv + ?Sized>(&mut self, env: &mut T) -> RunSummary {
        self.train_episodes(env, self.config.max_episodes)
    }

    pub fn train_episodes<T: TextEnv + ?Sized>(&mut self, env: &mut T, episodes: usize) -> RunSummary {
        info!(
            run = %self.run_id,
            episodes,
            learning_rate = self.config.learning_rate,
            discount_factor = self.config.discount_factor,
            max_steps = self.config.max_steps_per_episode,
            "starting training"
        );

        for _ in 0..episodes {
            self.run_episode(env);
        }

        let summary = self.recorder.summary();
        info!(
            run = %self.run_id,
            episodes = summary.episodes,
            done = summary.done,
            truncated = summary.truncated,
            mean_reward = summary.mean_reward,
            table_entries = self.table.len(),
            cached_states = self.cache.len(),
            "training finished"
        );
        summary
    }

    /// Plays one episode while learning, and records its statistics.
    pub fn run_episode<T: TextEnv + ?Sized>(&mut self, env: &mut T) -> EpisodeReport {
        let episode = self.episodes_run;
        let exploration = self.config.exploration_rate(episode);
        let mut trace = self.config.keep_traces.then(|| EpisodeTrace::new(episode));

        let stats = self.learn_episode(env, episode, exploration, trace.as_mut());

        self.episodes_run += 1;
        self.recorder.record(episode, stats.clone());
        self.log_progress(episode, exploration, &stats);

        EpisodeReport {
            episode,
            stats,
            trace,
        }
    }

    // START -> RUNNING -> {DONE, TRUNCATED}
    fn learn_episode<T: TextEnv + ?Sized>(
        &mut self,
        env: &mut T,
        episode: usize,
        exploration: f64,
        mut trace: Option<&mut EpisodeTrace>,
    ) -> EpisodeStats {
        let span = tracing::debug_span!("episode", run = %self.run_id, episode);
        let _guard = span.enter();

        let max_steps = self.config.max_steps_per_episode;
        let lr = self.config.learning_rate;
        let discount = self.config.discount_factor;

        let mut history = VecDeque::with_capacity(self.config.history_window);
        let mut total_reward = 0.0;
        let mut steps = 0;

        let outcome = 'episode: {
            let observation = match env.reset() {
                Ok(observation) => observation,
                Err(err) => {
                    self.report_env_failure(episode, steps, None, &err);
                    break 'episode EpisodeOutcome::Truncated(TruncationReason::EnvFailure);
                }
            };
            let mut state = self.encode(env, &observation, &history);
            let mut actions = match self.cache.actions_for(env, state, &observation) {
                Ok(actions) => actions,
                Err(err) => {
                    self.report_env_failure(episode, steps, None, &err);
                    break 'episode EpisodeOutcome::Truncated(TruncationReason::EnvFailure);
                }
            };

            loop {
                if steps >= max_steps {
                    debug!(steps, "step budget exhausted");
                    break EpisodeOutcome::Truncated(TruncationReason::StepBudget);
                }

                let action =
                    match policy::choose(&self.table, state, &actions, exploration, &mut self.rng) {
                        Ok(action) => action,
                        Err(PolicyError::EmptyActionSet) => {
                            warn!(
                                run = %self.run_id,
                                episode,
                                step = steps,
                                state = %state,
                                "no valid actions, ending episode"
                            );
                            break EpisodeOutcome::Truncated(TruncationReason::EmptyActions);
                        }
                    };

                let result = match env.step(&action) {
                    Ok(result) => result,
                    Err(err) => {
                        self.report_env_failure(episode, steps, Some(&action), &err);
                        break EpisodeOutcome::Truncated(TruncationReason::EnvFailure);
                    }
                };
                steps += 1;
                total_reward += result.reward;
                debug!(step = steps, action = %action, reward = result.reward, done = result.done, "step");

                self.remember(&mut history, &action);
                let next_state = self.encode(env, &result.observation, &history);
                let next_actions = if result.done {
                    Vec::new()
                } else {
                    match self.cache.actions_for(env, next_state, &result.observation) {
                        Ok(actions) => actions,
                        Err(err) => {
                            self.report_env_failure(episode, steps, Some(&action), &err);
                            break EpisodeOutcome::Truncated(TruncationReason::EnvFailure);
                        }
                    }
                };

                // Q(s,a) <- (1 - lr) * Q(s,a) + lr * (r + discount * max_a' Q(s',a'))
                let future = if result.done {
                    0.0
                } else {
                    self.table.best_value(next_state, &next_actions)
                };
                let target = result.reward + discount * future;
                let current = self.table.value_of(state, &action);
                self.table
                    .update(state, &action, (1.0 - lr) * current + lr * target);

                if let Some(trace) = trace.as_deref_mut() {
                    trace.push(Transition {
                        state,
                        action,
                        reward: result.reward,
                        next_state,
                        done: result.done,
                    });
                }

                if result.done {
                    break EpisodeOutcome::Done;
                }
                state = next_state;
                actions = next_actions;
            }
        };

        EpisodeStats {
            total_reward,
            steps,
            outcome,
            score: env.score(),
        }
    }

    pub(super) fn encode<T: TextEnv + ?Sized>(
        &self,
        env: &T,
        observation: &str,
        history: &VecDeque<String>,
    ) -> StateKey {
        let context = EncodeContext {
            location: env.location(),
            recent_actions: history.iter().cloned().collect(),
        };
        self.encoder.encode(observation, &context)
    }

    /// Keeps the last `history_window` actions.
    pub(super) fn remember(&self, history: &mut VecDeque<String>, action: &str) {
        let window = self.config.history_window;
        if window == 0 {
            return;
        }
        if history.len() == window {
            history.pop_front();
        }
        history.push_back(action.to_string());
    }

    fn report_env_failure(&self, episode: usize, step: usize, action: Option<&str>, err: &EnvError) {
        warn!(
            run = %self.run_id,
            episode,
            step,
            last_action = action.unwrap_or("<none>"),
            error = %err,
            "environment failed, truncating episode"
        );
    }

    fn log_progress(&self, episode: usize, exploration: f64, stats: &EpisodeStats) {
        let interval = self.config.log_interval;
        if interval == 0 || (episode + 1) % interval != 0 {
            return;
        }
        let summary = self.recorder.summary();
        info!(
            episode = episode + 1,
            reward = stats.total_reward,
            steps = stats.steps,
            outcome = %stats.outcome,
            score = ?stats.score,
            exploration,
            mean_reward = summary.mean_reward,
            "episode finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{CorridorEnv, StepResult};
    use crate::policy::ExplorationSchedule;

    fn config() -> RunConfig {
        RunConfig {
            learning_rate: 0.5,
            discount_factor: 0.9,
            exploration_start: 1.0,
            exploration_floor: 0.0,
            exploration_decay: ExplorationSchedule::Constant,
            max_episodes: 5,
            max_steps_per_episode: 20,
            seed: Some(1),
            log_interval: 0,
            ..RunConfig::default()
        }
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let cfg = RunConfig {
            learning_rate: 0.0,
            ..config()
        };
        assert!(matches!(QLearner::new(cfg), Err(ConfigError::LearningRate(_))));
    }

    #[test]
    fn td_update_matches_the_formula() {
        // One forced step from START to MID, then one from MID to GOAL.
        let cfg = RunConfig {
            default_actions: Vec::new(),
            keep_traces: true,
            ..config()
        };
        let mut learner = QLearner::new(cfg).unwrap();
        let mut env = CorridorEnv::with_rooms(
            vec!["start".to_string(), "goal".to_string()],
            4.0,
        );

        let report = learner.run_episode(&mut env);
        let trace = report.trace.unwrap();
        // In a two-room corridor `back` loops on start and `forward` wins.
        let last = trace.transitions.last().unwrap();
        assert!(last.done);
        assert_eq!(last.action, CorridorEnv::FORWARD);
        // Terminal target is the bare reward: 0.5 * 0 + 0.5 * 4.
        assert_eq!(learner.table().value_of(last.state, CorridorEnv::FORWARD), 2.0);
        assert_eq!(trace.total_reward(), report.stats.total_reward);
        assert_eq!(trace.len(), report.stats.steps);
    }

    #[test]
    fn traces_are_off_by_default() {
        let mut learner = QLearner::new(config()).unwrap();
        let report = learner.run_episode(&mut CorridorEnv::chain());
        assert!(report.trace.is_none());
        assert_eq!(learner.episodes_run(), 1);
        assert_eq!(learner.recorder().len(), 1);
    }

    struct Loop;

    impl TextEnv for Loop {
        fn reset(&mut self) -> Result<String, EnvError> {
            Ok("A maze of twisty little passages, all alike.".to_string())
        }

        fn step(&mut self, _action: &str) -> Result<StepResult, EnvError> {
            Ok(StepResult::new(
                "A maze of twisty little passages, all alike.",
                -1.0,
                false,
            ))
        }

        fn valid_actions(&mut self, _observation: &str) -> Result<Vec<String>, EnvError> {
            Ok(vec!["north".to_string(), "south".to_string()])
        }
    }

    #[test]
    fn cyclic_game_is_truncated_at_the_step_budget() {
        let mut learner = QLearner::new(config()).unwrap();
        let report = learner.run_episode(&mut Loop);
        assert_eq!(report.stats.steps, 20);
        assert_eq!(
            report.stats.outcome,
            EpisodeOutcome::Truncated(TruncationReason::StepBudget)
        );
        assert_eq!(report.stats.total_reward, -20.0);
    }

    #[test]
    fn debug_output_names_the_run() {
        let learner = QLearner::new(config()).unwrap();
        let text = format!("{learner:?}");
        assert!(text.contains("QLearner"));
        assert!(text.contains(&learner.run_id().to_string()));
    }
}
