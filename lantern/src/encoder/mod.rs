//! Observation text to discrete state keys.
//!
//! Encoders are pure: the same observation and context always give the same
//! key. Keys are FNV-1a hashes so they stay stable across processes and a
//! saved Q-table can be reloaded by a later run.
mod history;
mod text;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use history::HistoryEncoder;
pub use text::{BagOfWordsEncoder, ExactTextEncoder, NormalizedTextEncoder, normalize_observation};

/// Hashable identifier of a game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(u64);

impl StateKey {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// World metadata available next to the observation text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeContext {
    /// Room or location name reported by the game.
    pub location: Option<String>,
    /// Most recent actions, oldest first.
    pub recent_actions: Vec<String>,
}

impl EncodeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_recent_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recent_actions = actions.into_iter().map(Into::into).collect();
        self
    }
}

pub trait StateEncoder {
    fn encode(&self, observation: &str, context: &EncodeContext) -> StateKey;
}

/// Encoder selection for config files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderKind {
    Exact,
    #[default]
    Normalized,
    BagOfWords,
}

impl EncoderKind {
    /// Builds the encoder, wrapped in a [`HistoryEncoder`] when
    /// `history_window` is non-zero.
    pub fn build(self, history_window: usize) -> Box<dyn StateEncoder + Send + Sync> {
        fn wrap<E>(inner: E, window: usize) -> Box<dyn StateEncoder + Send + Sync>
        where
            E: StateEncoder + Send + Sync + 'static,
        {
            if window == 0 {
                Box::new(inner)
            } else {
                Box::new(HistoryEncoder::new(inner, window))
            }
        }

        match self {
            EncoderKind::Exact => wrap(ExactTextEncoder, history_window),
            EncoderKind::Normalized => wrap(NormalizedTextEncoder, history_window),
            EncoderKind::BagOfWords => wrap(BagOfWordsEncoder, history_window),
        }
    }
}

impl<E: StateEncoder + ?Sized> StateEncoder for Box<E> {
    fn encode(&self, observation: &str, context: &EncodeContext) -> StateKey {
        (**self).encode(observation, context)
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a. Fields are terminated with `0xff`, which never appears in
/// UTF-8, so `("ab", "c")` and `("a", "bc")` hash differently.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fnv64(u64);

impl Fnv64 {
    pub(crate) fn new() -> Self {
        Self(FNV_OFFSET)
    }

    pub(crate) fn seeded(key: StateKey) -> Self {
        let mut h = Self::new();
        h.write(&key.as_u64().to_le_bytes());
        h
    }

    pub(crate) fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= u64::from(b);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }

    pub(crate) fn write_field(&mut self, field: &str) {
        self.write(field.as_bytes());
        self.write(&[0xff]);
    }

    pub(crate) fn finish(self) -> StateKey {
        StateKey(self.0)
    }
}

/// Mixes the location into a base key. No location, no change.
pub(crate) fn with_location(key: StateKey, context: &EncodeContext) -> StateKey {
    match &context.location {
        Some(location) => {
            let mut h = Fnv64::seeded(key);
            h.write_field("location");
            h.write_field(location);
            h.finish()
        }
        None => key,
    }
}
