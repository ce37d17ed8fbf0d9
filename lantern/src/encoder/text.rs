use std::collections::BTreeSet;

use super::{EncodeContext, Fnv64, StateEncoder, StateKey, with_location};

/// Hashes the observation exactly as the game printed it.
///
/// Any change in wording, even random flavor text, yields a new key. Such
/// aliasing slows learning down but never breaks it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactTextEncoder;

impl StateEncoder for ExactTextEncoder {
    fn encode(&self, observation: &str, context: &EncodeContext) -> StateKey {
        let mut h = Fnv64::new();
        h.write_field(observation);
        with_location(h.finish(), context)
    }
}

/// Hashes the cleaned-up observation (see [`normalize_observation`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedTextEncoder;

impl StateEncoder for NormalizedTextEncoder {
    fn encode(&self, observation: &str, context: &EncodeContext) -> StateKey {
        let mut h = Fnv64::new();
        h.write_field(&normalize_observation(observation));
        with_location(h.finish(), context)
    }
}

/// Hashes the set of words in the observation, ignoring order, repetition,
/// case and punctuation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BagOfWordsEncoder;

impl StateEncoder for BagOfWordsEncoder {
    fn encode(&self, observation: &str, context: &EncodeContext) -> StateKey {
        let normalized = normalize_observation(observation);
        let words: BTreeSet<&str> = normalized
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        let mut h = Fnv64::new();
        for word in words {
            h.write_field(word);
        }
        with_location(h.finish(), context)
    }
}

/// Cleans interpreter output into comparable text.
///
/// Interpreters bridged from other runtimes often hand back the repr of a
/// byte string (`b'West of House\n...'`) with escaped newlines and quotes.
/// This strips the `b'`/`b"` wrapper and surrounding quotes, turns `\n`
/// escapes and real line breaks into spaces, unescapes `\'`, collapses
/// whitespace and lowercases.
pub fn normalize_observation(observation: &str) -> String {
    let mut text = observation.trim();
    for prefix in ["b'", "b\""] {
        if let Some(rest) = text.strip_prefix(prefix) {
            text = rest;
            break;
        }
    }
    let text = text
        .replace("\\'", "'")
        .replace("\\n", " ")
        .replace("\\\"", "\"");
    let text = text.trim().trim_matches(|c| c == '\'' || c == '"');

    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
