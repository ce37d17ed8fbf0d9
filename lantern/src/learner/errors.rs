use thiserror::Error;

use crate::env::EnvError;

#[derive(Error, Debug)]
pub enum PlayError {
    #[error("this game has no walkthrough")]
    NoWalkthrough,

    #[error("unknown play mode {0:?}, expected greedy, random or walkthrough")]
    UnknownMode(String),

    #[error(transparent)]
    Env(#[from] EnvError),
}
