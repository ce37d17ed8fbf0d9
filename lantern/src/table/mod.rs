// lantern/src/table/mod.rs
mod errors;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::encoder::StateKey;

pub use errors::TableError;

/// Sparse action-value table.
///
/// Rows are created lazily on first write; unseen `(state, action)` pairs
/// read as `default_value`. Nothing is ever evicted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    rows: HashMap<StateKey, HashMap<String, f64>>,
    default_value: f64,
    entries: usize,
}

impl QTable {
    pub fn new(default_value: f64) -> Self {
        Self {
            rows: HashMap::new(),
            default_value,
            entries: 0,
        }
    }

    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    pub fn value_of(&self, state: StateKey, action: &str) -> f64 {
        self.rows
            .get(&state)
            .and_then(|row| row.get(action))
            .copied()
            .unwrap_or(self.default_value)
    }

    /// Stores `value` exactly as given.
    pub fn update(&mut self, state: StateKey, action: &str, value: f64) {
        let row = self.rows.entry(state).or_default();
        if let Some(slot) = row.get_mut(action) {
            *slot = value;
        } else {
            row.insert(action.to_string(), value);
            self.entries += 1;
        }
    }

    /// Highest value among `candidates`, or the default when there are none.
    pub fn best_value<S: AsRef<str>>(&self, state: StateKey, candidates: &[S]) -> f64 {
        candidates
            .iter()
            .map(|a| self.value_of(state, a.as_ref()))
            .reduce(f64::max)
            .unwrap_or(self.default_value)
    }

    /// All candidates sharing the highest value, in candidate order.
    pub fn best_actions<'a, S: AsRef<str>>(
        &self,
        state: StateKey,
        candidates: &'a [S],
    ) -> Vec<&'a str> {
        let best = self.best_value(state, candidates);
        candidates
            .iter()
            .map(AsRef::as_ref)
            .filter(|a| self.value_of(state, a) == best)
            .collect()
    }

    /// Number of stored `(state, action)` entries.
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Number of states with at least one stored entry.
    pub fn state_count(&self) -> usize {
        self.rows.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateKey, &str, f64)> + '_ {
        self.rows.iter().flat_map(|(state, row)| {
            row.iter()
                .map(move |(action, value)| (*state, action.as_str(), *value))
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &self.snapshot())?;
        writer.flush()?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let reader = BufReader::new(File::open(path)?);
        let snapshot: Snapshot = serde_json::from_reader(reader)?;
        Ok(Self::from_snapshot(snapshot))
    }

    fn snapshot(&self) -> Snapshot {
        let mut entries: Vec<SnapshotEntry> = self
            .iter()
            .map(|(state, action, value)| SnapshotEntry {
                state,
                action: action.to_string(),
                value,
            })
            .collect();
        entries.sort_by(|a, b| a.state.cmp(&b.state).then_with(|| a.action.cmp(&b.action)));
        Snapshot {
            default_value: self.default_value,
            entries,
        }
    }

    fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut table = Self::new(snapshot.default_value);
        for entry in snapshot.entries {
            table.update(entry.state, &entry.action, entry.value);
        }
        table
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    default_value: f64,
    entries: Vec<SnapshotEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotEntry {
    state: StateKey,
    action: String,
    value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALL: StateKey = StateKey::from_raw(1);
    const CELLAR: StateKey = StateKey::from_raw(2);

    #[test]
    fn unseen_pairs_read_as_default() {
        let table = QTable::new(0.0);
        assert_eq!(table.value_of(HALL, "north"), 0.0);
        assert!(table.is_empty());

        let optimistic = QTable::new(5.0);
        assert_eq!(optimistic.value_of(HALL, "north"), 5.0);
    }

    #[test]
    fn update_stores_value_exactly() {
        let mut table = QTable::new(0.0);
        for v in [0.1, -3.25, 1e-12, 7.0] {
            table.update(HALL, "take lamp", v);
            assert_eq!(table.value_of(HALL, "take lamp"), v);
        }
        assert_eq!(table.len(), 1);
        assert_eq!(table.state_count(), 1);
    }

    #[test]
    fn best_value_of_empty_set_is_default() {
        let mut table = QTable::new(-1.5);
        table.update(HALL, "north", 4.0);
        let none: [&str; 0] = [];
        assert_eq!(table.best_value(HALL, &none), -1.5);
        assert!(table.best_actions(HALL, &none).is_empty());
    }

    #[test]
    fn best_value_only_considers_candidates() {
        let mut table = QTable::new(0.0);
        table.update(HALL, "north", 4.0);
        table.update(HALL, "south", -2.0);
        assert_eq!(table.best_value(HALL, &["south", "east"]), 0.0);
        assert_eq!(table.best_value(HALL, &["south"]), -2.0);
        assert_eq!(table.best_value(HALL, &["north", "south"]), 4.0);
        assert_eq!(table.best_value(CELLAR, &["north"]), 0.0);
    }

    #[test]
    fn best_actions_returns_every_tie() {
        let mut table = QTable::new(0.0);
        table.update(HALL, "north", 2.0);
        table.update(HALL, "east", 2.0);
        table.update(HALL, "south", 1.0);
        let candidates = ["north", "south", "east", "west"];
        assert_eq!(table.best_actions(HALL, &candidates), vec!["north", "east"]);
    }

    #[test]
    fn snapshot_round_trip() {
        let mut table = QTable::new(0.5);
        table.update(HALL, "north", 1.0);
        table.update(HALL, "open door", -0.25);
        table.update(CELLAR, "light lamp", 9.75);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.json");
        table.save(&path).unwrap();
        let loaded = QTable::load(&path).unwrap();

        assert_eq!(loaded, table);
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.default_value(), 0.5);
    }

    #[test]
    fn load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(QTable::load(&path), Err(TableError::Snapshot(_))));
        assert!(matches!(
            QTable::load(dir.path().join("missing.json")),
            Err(TableError::Io(_))
        ));
    }
}
