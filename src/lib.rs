//! Python bindings for the `lantern` Q-learning agent.
//!
//! Build with `maturin develop --features extension-module` and drive a
//! Jericho-style game from Python:
//!
//! ```python
//! import lantern_py
//! agent = lantern_py.Agent({"learning_rate": 0.5, "max_episodes": 200})
//! summary = agent.train(env)
//! print(agent.evaluate(env, "greedy", 10))
//! ```
pub use lantern;

#[cfg(feature = "python")]
mod agent;
#[cfg(feature = "python")]
mod env;

#[cfg(feature = "python")]
pub use env::PyTextEnv;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// The name of this function must match the lib.name in Cargo.toml
#[cfg(feature = "python")]
#[pymodule]
fn lantern_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<agent::PyAgent>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
