use super::{EnvError, StepResult, TextEnv};

/// Deterministic corridor of rooms with the exit at the far end.
///
/// `forward` moves one room toward the exit, `back` one room toward the
/// start (staying put in the first room). Entering the last room pays
/// `exit_reward` and ends the episode; every other move pays nothing.
#[derive(Debug, Clone)]
pub struct CorridorEnv {
    rooms: Vec<String>,
    position: usize,
    exit_reward: f64,
    score: f64,
    step_count: usize,
    done: bool,
}

impl CorridorEnv {
    pub const FORWARD: &'static str = "forward";
    pub const BACK: &'static str = "back";

    /// A corridor of `len` rooms (at least two).
    pub fn new(len: usize) -> Self {
        let len = len.max(2);
        let rooms = (0..len)
            .map(|i| {
                if i + 1 == len {
                    "Daylight spills through the open exit door.".to_string()
                } else {
                    format!("You stand in room {} of a narrow stone corridor.", i + 1)
                }
            })
            .collect();
        Self::with_rooms(rooms, 10.0)
    }

    /// The three-room chain START -> MID -> GOAL paying 0/0/+10.
    pub fn chain() -> Self {
        Self::with_rooms(
            vec![
                "START. A damp cellar. A passage leads onward.".to_string(),
                "MID. A torch-lit hallway.".to_string(),
                "GOAL. You climb out into the sunlight.".to_string(),
            ],
            10.0,
        )
    }

    pub fn with_rooms(rooms: Vec<String>, exit_reward: f64) -> Self {
        Self {
            rooms,
            position: 0,
            exit_reward,
            score: 0.0,
            step_count: 0,
            done: false,
        }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    fn exit(&self) -> usize {
        self.rooms.len().saturating_sub(1)
    }
}

impl TextEnv for CorridorEnv {
    fn reset(&mut self) -> Result<String, EnvError> {
        if self.rooms.is_empty() {
            return Err(EnvError::Closed);
        }
        self.position = 0;
        self.score = 0.0;
        self.step_count = 0;
        self.done = false;
        Ok(self.rooms[0].clone())
    }

    fn step(&mut self, action: &str) -> Result<StepResult, EnvError> {
        if self.done || self.rooms.is_empty() {
            return Err(EnvError::Closed);
        }
        match action {
            Self::FORWARD => self.position = (self.position + 1).min(self.exit()),
            Self::BACK => self.position = self.position.saturating_sub(1),
            other => {
                return Err(EnvError::InvalidAction {
                    action: other.to_string(),
                    reason: "the corridor only goes forward or back".to_string(),
                });
            }
        }
        self.step_count += 1;

        let done = self.position == self.exit();
        let reward = if done { self.exit_reward } else { 0.0 };
        self.score += reward;
        self.done = done;
        Ok(StepResult::new(self.rooms[self.position].clone(), reward, done))
    }

    fn valid_actions(&mut self, _observation: &str) -> Result<Vec<String>, EnvError> {
        if self.done {
            return Ok(Vec::new());
        }
        Ok(vec![Self::FORWARD.to_string(), Self::BACK.to_string()])
    }

    fn score(&self) -> Option<f64> {
        Some(self.score)
    }

    fn walkthrough(&self) -> Option<Vec<String>> {
        Some(vec![Self::FORWARD.to_string(); self.exit()])
    }

    fn location(&self) -> Option<String> {
        Some(format!("room-{}", self.position))
    }
}
