use serde::{Deserialize, Serialize};

use crate::types::{ComponentId, HashMap};

/// On/off assignment for every component at one step. Ids the vector does
/// not know read as off.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateVector(HashMap<ComponentId, bool>);

impl StateVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> bool {
        self.0.get(id).copied().unwrap_or(false)
    }

    pub fn lookup(&self, id: &str) -> Option<bool> {
        self.0.get(id).copied()
    }

    pub fn insert(&mut self, id: ComponentId, state: bool) {
        self.0.insert(id, state);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ComponentId, bool)> + '_ {
        self.0.iter().map(|(id, state)| (id, *state))
    }

    pub fn count_on(&self) -> usize {
        self.0.values().filter(|state| **state).count()
    }
}

impl FromIterator<(ComponentId, bool)> for StateVector {
    fn from_iter<T: IntoIterator<Item = (ComponentId, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub step: usize,
    pub states: StateVector,
}

/// Append-only record of a run, starting with the step 0 entry.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(Vec<HistoryEntry>);

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: usize, states: StateVector) {
        self.0.push(HistoryEntry { step, states });
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.0
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.0.last()
    }

    pub fn previous(&self) -> Option<&HistoryEntry> {
        self.0.len().checked_sub(2).map(|idx| &self.0[idx])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}
