//! Tabular Q-learning for text adventures.
//!
//! An agent observes the game's text, hashes it into a [`StateKey`], picks one of
//! the actions the game currently accepts and learns action values with TD(0)
//! updates. The game itself lives behind [`TextEnv`].
pub mod config;
pub mod encoder;
pub mod env;
pub mod error;
pub mod learner;
pub mod metrics;
pub mod policy;
pub mod table;
pub mod train;

pub use config::{ConfigError, RunConfig};
pub use encoder::{
    BagOfWordsEncoder, EncodeContext, EncoderKind, ExactTextEncoder, HistoryEncoder,
    NormalizedTextEncoder, StateEncoder, StateKey,
};
pub use env::{CorridorEnv, EnvError, StepResult, TextEnv, ValidActionCache};
pub use error::{Error, Result};
pub use learner::{
    BoxedEncoder, EpisodeReport, EpisodeTrace, Evaluation, PlayError, PlayMode, QLearner,
    Transition,
};
pub use metrics::{EpisodeOutcome, EpisodeStats, Recorder, RunSummary, TruncationReason};
pub use policy::{ExplorationSchedule, PolicyError};
pub use table::{QTable, TableError};
pub use train::{TrainingStats, train};
