use lantern::{EnvError, StepResult, TextEnv};
use pyo3::prelude::*;
use pyo3::types::PyTuple;

/// A Python game object driven through the Jericho `FrotzEnv` methods:
/// `reset`, `step`, `get_valid_actions` and, when present, `get_score`,
/// `get_walkthrough` and `get_player_location`.
pub struct PyTextEnv {
    inner: Py<PyAny>,
}

impl PyTextEnv {
    pub fn new(inner: Py<PyAny>) -> Self {
        Self { inner }
    }

    fn call<R>(&self, f: impl FnOnce(&Bound<'_, PyAny>) -> PyResult<R>) -> Result<R, EnvError> {
        Python::with_gil(|py| f(self.inner.bind(py))).map_err(EnvError::backend)
    }

    /// Calls an optional no-argument method; missing methods and failures
    /// both read as `None`.
    fn optional<R>(&self, method: &str) -> Option<R>
    where
        R: for<'py> FromPyObject<'py>,
    {
        Python::with_gil(|py| {
            let env = self.inner.bind(py);
            if !env.hasattr(method).ok()? {
                return None;
            }
            env.call_method0(method).and_then(|v| v.extract()).ok()
        })
    }
}

impl TextEnv for PyTextEnv {
    fn reset(&mut self) -> Result<String, EnvError> {
        self.call(|env| {
            let out = env.call_method0("reset")?;
            // (observation, info) from Jericho, a bare string from simpler games
            match out.downcast::<PyTuple>() {
                Ok(tuple) => tuple.get_item(0)?.extract(),
                Err(_) => out.extract(),
            }
        })
    }

    fn step(&mut self, action: &str) -> Result<StepResult, EnvError> {
        self.call(|env| {
            let out = env.call_method1("step", (action,))?;
            let observation: String = out.get_item(0)?.extract()?;
            let reward: f64 = out.get_item(1)?.extract()?;
            let done: bool = out.get_item(2)?.extract()?;
            Ok(StepResult::new(observation, reward, done))
        })
    }

    fn valid_actions(&mut self, _observation: &str) -> Result<Vec<String>, EnvError> {
        self.call(|env| env.call_method0("get_valid_actions")?.extract())
    }

    fn score(&self) -> Option<f64> {
        self.optional("get_score")
    }

    fn walkthrough(&self) -> Option<Vec<String>> {
        self.optional("get_walkthrough")
    }

    fn location(&self) -> Option<String> {
        Python::with_gil(|py| {
            let env = self.inner.bind(py);
            if !env.hasattr("get_player_location").ok()? {
                return None;
            }
            let location = env.call_method0("get_player_location").ok()?;
            if location.is_none() {
                return None;
            }
            // str() of a ZObject also lists its children and attributes
            if let Ok(num) = location.getattr("num").and_then(|n| n.extract::<i64>()) {
                return Some(format!("room-{num}"));
            }
            location
                .getattr("name")
                .and_then(|n| n.extract::<String>())
                .ok()
                .or_else(|| location.str().ok().map(|s| s.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use pyo3::types::PyModule;

    use super::*;

    const GAMES: &std::ffi::CStr = c"
class Room:
    def __init__(self, num, name, child):
        self.num = num
        self.name = name
        self.child = child

    def __str__(self):
        return f'Obj{self.num}: {self.name} Parent0 Sibling0 Child{self.child}'

class House:
    def __init__(self):
        self.child = 0
        self.moves = 0

    def reset(self):
        self.child = 0
        self.moves = 0
        return ('West of House', {'moves': 0, 'score': 0})

    def step(self, action):
        self.moves += 1
        if action == 'drop leaflet':
            self.child = 42
        return ('Dropped.', 1, False, {'moves': self.moves})

    def get_valid_actions(self):
        return ['drop leaflet', 'north']

    def get_player_location(self):
        return Room(180, 'West of House', self.child)

    def get_score(self):
        return self.moves

class Cellar:
    def reset(self):
        return 'It is pitch black.'

    def step(self, action):
        raise RuntimeError('interpreter died')

    def get_valid_actions(self):
        return []
";

    fn game(name: &str) -> PyTextEnv {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let module = PyModule::from_code(py, GAMES, c"games.py", c"games").unwrap();
            PyTextEnv::new(module.getattr(name).unwrap().call0().unwrap().unbind())
        })
    }

    #[test]
    fn jericho_style_game_round_trips() {
        let mut env = game("House");
        assert_eq!(env.reset().unwrap(), "West of House");
        assert_eq!(env.valid_actions("West of House").unwrap(), vec!["drop leaflet", "north"]);

        let out = env.step("north").unwrap();
        assert_eq!(out, StepResult::new("Dropped.", 1.0, false));
        assert_eq!(env.score(), Some(1.0));
        assert_eq!(env.walkthrough(), None);
    }

    #[test]
    fn location_ignores_room_contents() {
        let mut env = game("House");
        env.reset().unwrap();
        let before = env.location();
        env.step("drop leaflet").unwrap();
        assert_eq!(before.as_deref(), Some("room-180"));
        assert_eq!(env.location(), before);
    }

    #[test]
    fn bare_game_without_extras() {
        let mut env = game("Cellar");
        assert_eq!(env.reset().unwrap(), "It is pitch black.");
        assert!(matches!(env.step("light lamp"), Err(EnvError::Backend(_))));
        assert!(env.valid_actions("").unwrap().is_empty());
        assert_eq!(env.location(), None);
        assert_eq!(env.score(), None);
    }
}
