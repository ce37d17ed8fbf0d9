use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("no valid actions to choose from")]
    EmptyActionSet,
}
