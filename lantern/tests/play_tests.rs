// tests/play_tests.rs
//
// Playing without learning: greedy, random and walkthrough modes.

mod common;

use common::{LoopEnv, SilentEnv, quiet_config};
use lantern::{
    CorridorEnv, EpisodeOutcome, PlayError, PlayMode, QLearner, RunConfig, TruncationReason,
};

#[test]
fn game_without_walkthrough_is_an_error() {
    let mut learner = QLearner::new(quiet_config()).unwrap();
    let err = learner
        .play_episode(&mut LoopEnv, PlayMode::Walkthrough, 10)
        .unwrap_err();
    assert!(matches!(err, PlayError::NoWalkthrough));
}

#[test]
fn random_play_respects_the_step_budget() {
    let mut learner = QLearner::new(quiet_config()).unwrap();
    let stats = learner
        .play_episode(&mut LoopEnv, PlayMode::Random, 12)
        .unwrap();
    assert_eq!(stats.steps, 12);
    assert_eq!(
        stats.outcome,
        EpisodeOutcome::Truncated(TruncationReason::StepBudget)
    );
    assert_eq!(stats.score, None);
}

#[test]
fn walkthrough_cut_short_by_the_budget() {
    let mut learner = QLearner::new(quiet_config()).unwrap();
    let stats = learner
        .play_episode(&mut CorridorEnv::new(10), PlayMode::Walkthrough, 3)
        .unwrap();
    assert_eq!(stats.steps, 3);
    assert!(stats.outcome.is_truncated());
    assert_eq!(stats.score, Some(0.0));
}

#[test]
fn greedy_play_on_an_untrained_table_still_picks_valid_commands() {
    let mut learner = QLearner::new(quiet_config()).unwrap();
    let stats = learner
        .play_episode(&mut CorridorEnv::chain(), PlayMode::Greedy, 200)
        .unwrap();
    // Ties are broken at random, so this is a random walk that ends.
    assert!(stats.steps >= 2);
    assert!(learner.table().is_empty());
}

#[test]
fn silent_game_without_fallback_has_nothing_to_play() {
    let cfg = RunConfig {
        default_actions: Vec::new(),
        ..quiet_config()
    };
    let mut learner = QLearner::new(cfg).unwrap();
    let stats = learner
        .play_episode(&mut SilentEnv::default(), PlayMode::Greedy, 10)
        .unwrap();
    assert_eq!(stats.steps, 0);
    assert_eq!(
        stats.outcome,
        EpisodeOutcome::Truncated(TruncationReason::EmptyActions)
    );
}

#[test]
fn trained_agent_matches_the_walkthrough() {
    let cfg = RunConfig {
        learning_rate: 0.5,
        discount_factor: 0.9,
        exploration_start: 0.3,
        max_episodes: 200,
        max_steps_per_episode: 30,
        ..quiet_config()
    };
    let mut learner = QLearner::new(cfg).unwrap();
    let mut env = CorridorEnv::new(6);
    learner.train(&mut env);

    let greedy = learner.evaluate(&mut env, PlayMode::Greedy, 10, 8).unwrap();
    let walkthrough = learner
        .evaluate(&mut env, PlayMode::Walkthrough, 10, 8)
        .unwrap();
    assert_eq!(greedy.games, 10);
    assert_eq!(greedy.scores.len(), 10);
    assert_eq!(greedy.mean_score, walkthrough.mean_score);
    assert_eq!(walkthrough.mean_score, 10.0);
}
