// tests/common/mod.rs
//
// Small scripted games shared by the integration tests.
#![allow(dead_code)]

use std::io;

use lantern::{CorridorEnv, EnvError, RunConfig, StepResult, TextEnv};

/// Seeded config with progress logging off.
pub fn quiet_config() -> RunConfig {
    RunConfig {
        seed: Some(7),
        log_interval: 0,
        ..RunConfig::default()
    }
}

/// A game that never ends and always looks the same.
pub struct LoopEnv;

impl TextEnv for LoopEnv {
    fn reset(&mut self) -> Result<String, EnvError> {
        Ok("You are in a maze of twisty little passages, all alike.".to_string())
    }

    fn step(&mut self, _action: &str) -> Result<StepResult, EnvError> {
        Ok(StepResult::new(
            "You are in a maze of twisty little passages, all alike.",
            0.0,
            false,
        ))
    }

    fn valid_actions(&mut self, _observation: &str) -> Result<Vec<String>, EnvError> {
        Ok(vec!["north".to_string(), "down".to_string()])
    }
}

/// The three-room chain, except the first step of every `fail_every`th
/// episode raises a backend error.
pub struct FlakyEnv {
    pub inner: CorridorEnv,
    pub fail_every: usize,
    resets: usize,
    steps_this_episode: usize,
}

impl FlakyEnv {
    pub fn new(fail_every: usize) -> Self {
        Self {
            inner: CorridorEnv::chain(),
            fail_every,
            resets: 0,
            steps_this_episode: 0,
        }
    }
}

impl TextEnv for FlakyEnv {
    fn reset(&mut self) -> Result<String, EnvError> {
        self.resets += 1;
        self.steps_this_episode = 0;
        self.inner.reset()
    }

    fn step(&mut self, action: &str) -> Result<StepResult, EnvError> {
        self.steps_this_episode += 1;
        if self.resets % self.fail_every == 0 && self.steps_this_episode == 1 {
            return Err(EnvError::backend(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "interpreter crashed",
            )));
        }
        self.inner.step(action)
    }

    fn valid_actions(&mut self, observation: &str) -> Result<Vec<String>, EnvError> {
        self.inner.valid_actions(observation)
    }
}

/// The three-room chain whose `fail_on`th `valid_actions` call (counted from
/// one across the whole run) raises a backend error.
pub struct ActionsFailEnv {
    pub inner: CorridorEnv,
    pub fail_on: usize,
    calls: usize,
}

impl ActionsFailEnv {
    pub fn new(fail_on: usize) -> Self {
        Self {
            inner: CorridorEnv::chain(),
            fail_on,
            calls: 0,
        }
    }
}

impl TextEnv for ActionsFailEnv {
    fn reset(&mut self) -> Result<String, EnvError> {
        self.inner.reset()
    }

    fn step(&mut self, action: &str) -> Result<StepResult, EnvError> {
        self.inner.step(action)
    }

    fn valid_actions(&mut self, observation: &str) -> Result<Vec<String>, EnvError> {
        self.calls += 1;
        if self.calls == self.fail_on {
            return Err(EnvError::backend(io::Error::other("save state corrupted")));
        }
        self.inner.valid_actions(observation)
    }
}

/// A game whose story file cannot be loaded.
pub struct BrokenResetEnv;

impl TextEnv for BrokenResetEnv {
    fn reset(&mut self) -> Result<String, EnvError> {
        Err(EnvError::backend(io::Error::new(
            io::ErrorKind::NotFound,
            "zork1.z5 not found",
        )))
    }

    fn step(&mut self, _action: &str) -> Result<StepResult, EnvError> {
        Err(EnvError::Closed)
    }

    fn valid_actions(&mut self, _observation: &str) -> Result<Vec<String>, EnvError> {
        Err(EnvError::Closed)
    }
}

/// A game that never offers commands. Any command it does receive ends it.
#[derive(Default)]
pub struct SilentEnv {
    pub received: Vec<String>,
}

impl TextEnv for SilentEnv {
    fn reset(&mut self) -> Result<String, EnvError> {
        Ok("It is pitch black. You are likely to be eaten by a grue.".to_string())
    }

    fn step(&mut self, action: &str) -> Result<StepResult, EnvError> {
        self.received.push(action.to_string());
        Ok(StepResult::new("You have been eaten by a grue.", -10.0, true))
    }

    fn valid_actions(&mut self, _observation: &str) -> Result<Vec<String>, EnvError> {
        Ok(Vec::new())
    }
}
