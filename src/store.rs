//! Content-addressed working memory.
//!
//! The store deduplicates on full fact value: asserting a fact that is
//! already present is a no-op returning the existing id. Every entry carries
//! the epoch current at assertion time — the engine advances the epoch once
//! per rule firing, so derived facts outrank the initial load (epoch 0) when
//! the agenda breaks salience ties by recency.
//!
//! Retraction is deliberately not offered; the rule sets this engine runs
//! never retract mid-run. The id-based layout leaves room to add it without
//! reshaping the interface.

use std::collections::HashMap;

use crate::fact::{Fact, FactKind};

/// Stable handle to an asserted fact. Ids are dense and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FactId(u32);

impl FactId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct Entry {
    fact: Fact,
    stamp: u64,
}

/// The full set of currently asserted facts.
#[derive(Debug, Default)]
pub struct FactStore {
    entries: Vec<Entry>,
    index: HashMap<Fact, FactId>,
    epoch: u64,
}

impl FactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assert a fact. Returns its id and whether it was newly inserted;
    /// a duplicate is silently absorbed and reports the existing id.
    pub fn assert(&mut self, fact: Fact) -> (FactId, bool) {
        if let Some(&id) = self.index.get(&fact) {
            return (id, false);
        }
        let id = FactId(self.entries.len() as u32);
        self.index.insert(fact.clone(), id);
        self.entries.push(Entry {
            fact,
            stamp: self.epoch,
        });
        (id, true)
    }

    /// Advance the recency epoch. Facts asserted afterwards are "more
    /// recent" than everything before.
    pub fn advance_epoch(&mut self) {
        self.epoch += 1;
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn get(&self, id: FactId) -> &Fact {
        &self.entries[id.index()].fact
    }

    /// The epoch at which the fact was asserted.
    pub fn stamp(&self, id: FactId) -> u64 {
        self.entries[id.index()].stamp
    }

    /// All facts of one kind, in assertion order.
    pub fn facts_of(&self, kind: FactKind) -> impl Iterator<Item = (FactId, &Fact)> {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.fact.kind() == kind)
            .map(|(i, e)| (FactId(i as u32), &e.fact))
    }

    /// All facts, in assertion order.
    pub fn iter(&self) -> impl Iterator<Item = (FactId, &Fact)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (FactId(i as u32), &e.fact))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::Symptom;

    #[test]
    fn duplicate_assertion_returns_existing_id() {
        let mut store = FactStore::new();
        let (a, inserted_a) = store.assert(Symptom::new("fever").with_present(true).into());
        let (b, inserted_b) = store.assert(Symptom::new("fever").with_present(true).into());
        assert!(inserted_a);
        assert!(!inserted_b);
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn stamps_follow_epoch() {
        let mut store = FactStore::new();
        let (early, _) = store.assert(Symptom::new("fever").into());
        store.advance_epoch();
        store.advance_epoch();
        let (late, _) = store.assert(Symptom::new("chills").into());
        assert_eq!(store.stamp(early), 0);
        assert_eq!(store.stamp(late), 2);
    }

    #[test]
    fn facts_of_filters_by_kind() {
        let mut store = FactStore::new();
        store.assert(Symptom::new("fever").into());
        store.assert(crate::fact::Patient::new().with_unsafe_water(true).into());
        store.assert(Symptom::new("chills").into());

        let symptoms: Vec<_> = store.facts_of(FactKind::Symptom).collect();
        assert_eq!(symptoms.len(), 2);
        assert!(store.facts_of(FactKind::LabResult).next().is_none());
    }
}
