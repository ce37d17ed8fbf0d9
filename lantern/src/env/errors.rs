use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("Environment error: {0}")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),

    #[error("Environment rejected action {action:?}: {reason}")]
    InvalidAction { action: String, reason: String },

    #[error("Environment is closed")]
    Closed,
}

impl EnvError {
    /// Wraps any error raised by a game backend.
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        EnvError::Backend(Box::new(err))
    }
}
