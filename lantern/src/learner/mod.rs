//! The Q-learning loop and greedy/random/walkthrough play.
mod agent;
mod errors;
mod play;
mod trace;

pub use agent::{BoxedEncoder, EpisodeReport, QLearner};
pub use errors::PlayError;
pub use play::{Evaluation, PlayMode};
pub use trace::{EpisodeTrace, Transition};
