use dotenv::dotenv;
use lantern::{CorridorEnv, ExplorationSchedule, PlayMode, QLearner, RunConfig};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lantern=info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    // LANTERN_* variables (or a .env file) override these
    let config = RunConfig {
        learning_rate: 0.5,
        discount_factor: 0.9,
        exploration_start: 1.0,
        exploration_floor: 0.05,
        exploration_decay: ExplorationSchedule::Linear { episodes: 300 },
        max_episodes: 500,
        max_steps_per_episode: 100,
        log_interval: 50,
        ..RunConfig::default()
    }
    .with_env_overrides()?;

    println!("🚀 Training on a six-room corridor");
    let mut env = CorridorEnv::new(6);
    let mut learner = QLearner::new(config)?;
    let summary = learner.train(&mut env);

    println!(
        "✅ {} episodes, {} finished, mean reward {:.2} (variance {:.2}), mean steps {:.1}",
        summary.episodes,
        summary.done,
        summary.mean_reward,
        summary.reward_variance,
        summary.mean_steps
    );
    println!("📚 {} table entries", learner.table().len());

    let max_steps = learner.config().max_steps_per_episode;
    for mode in [PlayMode::Greedy, PlayMode::Random, PlayMode::Walkthrough] {
        let stats = learner.play_episode(&mut env, mode, max_steps)?;
        println!(
            "{mode}: {} in {} steps, reward {}",
            stats.outcome, stats.steps, stats.total_reward
        );
    }

    let eval = learner.evaluate(&mut env, PlayMode::Random, 20, max_steps)?;
    println!("🎲 random play averages {:.2} over {} games", eval.mean_score, eval.games);

    Ok(())
}
