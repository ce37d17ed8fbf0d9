use lantern::{Error, PlayMode, QLearner, QTable, RunConfig};
use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use serde_json::Value;

use crate::env::PyTextEnv;

fn to_py_err(err: impl Into<Error>) -> PyErr {
    match err.into() {
        err @ (Error::Config(_) | Error::Policy(_)) => PyValueError::new_err(err.to_string()),
        err @ Error::Table(_) => PyIOError::new_err(err.to_string()),
        err @ (Error::Env(_) | Error::Play(_)) => PyRuntimeError::new_err(err.to_string()),
    }
}

/// Round-trips through the `json` module so Python gets plain dicts.
fn to_python<'py, T: serde::Serialize>(py: Python<'py>, value: &T) -> PyResult<Bound<'py, PyAny>> {
    let text = serde_json::to_string(value).map_err(|e| PyValueError::new_err(e.to_string()))?;
    py.import("json")?.call_method1("loads", (text,))
}

/// Q-learning agent for Jericho-style games.
#[pyclass(name = "Agent", module = "lantern_py")]
pub struct PyAgent {
    learner: QLearner,
}

#[pymethods]
impl PyAgent {
    /// `config` is a dict with any `RunConfig` fields; omitted fields take
    /// their defaults and `LANTERN_*` environment variables override both.
    #[new]
    #[pyo3(signature = (config=None))]
    fn new(py: Python<'_>, config: Option<Bound<'_, PyAny>>) -> PyResult<Self> {
        let config = match config {
            Some(obj) => {
                let json: String = py.import("json")?.call_method1("dumps", (obj,))?.extract()?;
                RunConfig::from_json_str(&json).map_err(to_py_err)?
            }
            None => RunConfig::default(),
        };
        let config = config.with_env_overrides().map_err(to_py_err)?;
        let learner = QLearner::new(config).map_err(to_py_err)?;
        tracing::debug!(run = %learner.run_id(), "created agent");
        Ok(Self { learner })
    }

    /// Trains for `episodes` episodes (default `max_episodes`) and returns
    /// the run summary.
    #[pyo3(signature = (env, episodes=None))]
    fn train<'py>(
        &mut self,
        py: Python<'py>,
        env: Py<PyAny>,
        episodes: Option<usize>,
    ) -> PyResult<Bound<'py, PyAny>> {
        let mut env = PyTextEnv::new(env);
        let summary = match episodes {
            Some(n) => self.learner.train_episodes(&mut env, n),
            None => self.learner.train(&mut env),
        };
        to_python(py, &summary)
    }

    /// Plays one game without learning. `mode` is "greedy", "random" or
    /// "walkthrough".
    #[pyo3(signature = (env, mode="greedy", max_steps=None))]
    fn play<'py>(
        &mut self,
        py: Python<'py>,
        env: Py<PyAny>,
        mode: &str,
        max_steps: Option<usize>,
    ) -> PyResult<Bound<'py, PyAny>> {
        let mode: PlayMode = mode.parse().map_err(to_py_err)?;
        let max_steps = max_steps.unwrap_or(self.learner.config().max_steps_per_episode);
        let stats = self
            .learner
            .play_episode(&mut PyTextEnv::new(env), mode, max_steps)
            .map_err(to_py_err)?;
        to_python(py, &stats)
    }

    /// Mean score over `games` games.
    #[pyo3(signature = (env, mode="greedy", games=10, max_steps=None))]
    fn evaluate(
        &mut self,
        env: Py<PyAny>,
        mode: &str,
        games: usize,
        max_steps: Option<usize>,
    ) -> PyResult<f64> {
        let mode: PlayMode = mode.parse().map_err(to_py_err)?;
        let max_steps = max_steps.unwrap_or(self.learner.config().max_steps_per_episode);
        let evaluation = self
            .learner
            .evaluate(&mut PyTextEnv::new(env), mode, games, max_steps)
            .map_err(to_py_err)?;
        Ok(evaluation.mean_score)
    }

    fn summary<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        to_python(py, &self.learner.summary())
    }

    fn config<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        to_python(py, self.learner.config())
    }

    fn save(&self, path: &str) -> PyResult<()> {
        self.learner.table().save(path).map_err(to_py_err)
    }

    /// Replaces the learned table with the one saved at `path`.
    fn load(&mut self, path: &str) -> PyResult<()> {
        let table = QTable::load(path).map_err(to_py_err)?;
        self.learner.replace_table(table);
        Ok(())
    }

    #[getter]
    fn run_id(&self) -> String {
        self.learner.run_id().to_string()
    }

    #[getter]
    fn episodes_run(&self) -> usize {
        self.learner.episodes_run()
    }

    #[getter]
    fn table_size(&self) -> usize {
        self.learner.table().len()
    }

    fn __repr__(&self) -> String {
        let value = serde_json::to_value(self.learner.config()).unwrap_or(Value::Null);
        format!(
            "Agent(run_id={}, episodes_run={}, config={})",
            self.learner.run_id(),
            self.learner.episodes_run(),
            value
        )
    }
}
