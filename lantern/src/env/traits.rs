use crate::env::errors::EnvError;
use crate::env::types::StepResult;

/// A text game the agent can play.
///
/// The game is stateful and non-reentrant: one instance evolves step by step
/// and only the caller holding `&mut` may drive it. Observations are the raw
/// narrative text; actions are the commands typed at the prompt.
///
/// ## Example
/// ```ignore
/// struct Frotz {
///     // story file handle, interpreter state...
/// }
///
/// impl TextEnv for Frotz {
///     fn reset(&mut self) -> Result<String, EnvError> { /* restart story */ }
///     fn step(&mut self, action: &str) -> Result<StepResult, EnvError> { /* send command */ }
///     fn valid_actions(&mut self, observation: &str) -> Result<Vec<String>, EnvError> {
///         // ask the interpreter which commands change the world state
///     }
/// }
/// ```
pub trait TextEnv {
    /// Starts a fresh episode and returns the opening text.
    fn reset(&mut self) -> Result<String, EnvError>;

    fn step(&mut self, action: &str) -> Result<StepResult, EnvError>;

    /// Commands accepted in the current state. May be empty when the game is
    /// stuck or over.
    fn valid_actions(&mut self, observation: &str) -> Result<Vec<String>, EnvError>;

    /// Current in-game score, if the game keeps one.
    fn score(&self) -> Option<f64> {
        None
    }

    /// A known-good command sequence from reset to the end of the game.
    fn walkthrough(&self) -> Option<Vec<String>> {
        None
    }

    /// Extra world metadata (usually the room name) mixed into state keys.
    fn location(&self) -> Option<String> {
        None
    }
}
