use thiserror::Error;

use crate::config::ConfigError;
use crate::env::EnvError;
use crate::learner::PlayError;
use crate::policy::PolicyError;
use crate::table::TableError;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Play(#[from] PlayError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
