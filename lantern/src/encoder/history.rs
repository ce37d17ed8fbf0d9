use super::{EncodeContext, Fnv64, StateEncoder, StateKey};

/// Folds the last `window` actions into the key of an inner encoder.
///
/// Useful when the same room text means different things depending on what
/// was just done (a door you opened, a lamp you lit). A window of zero
/// behaves exactly like the inner encoder.
#[derive(Debug, Clone)]
pub struct HistoryEncoder<E> {
    inner: E,
    window: usize,
}

impl<E> HistoryEncoder<E> {
    pub fn new(inner: E, window: usize) -> Self {
        Self { inner, window }
    }
}

impl<E: StateEncoder> StateEncoder for HistoryEncoder<E> {
    fn encode(&self, observation: &str, context: &EncodeContext) -> StateKey {
        let base = self.inner.encode(observation, context);
        let recent = &context.recent_actions;
        let start = recent.len().saturating_sub(self.window);
        if start == recent.len() {
            return base;
        }

        let mut h = Fnv64::seeded(base);
        h.write_field("history");
        for action in &recent[start..] {
            h.write_field(action);
        }
        h.finish()
    }
}
