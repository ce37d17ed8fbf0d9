// lantern/src/env/mod.rs
mod cache;
mod corridor;
mod errors;
mod traits;
mod types;

pub use cache::ValidActionCache;
pub use corridor::CorridorEnv;
pub use errors::EnvError;
pub use traits::TextEnv;
pub use types::StepResult;
