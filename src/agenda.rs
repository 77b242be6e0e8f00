//! Agenda: the set of pending activations, ordered for conflict resolution.
//!
//! An activation is a `(rule, binding)` pair the current store satisfies and
//! that has not fired yet. Selection order is salience first (higher wins),
//! then recency (the activation whose supporting facts were asserted in the
//! most recent epoch wins), then rule declaration order, then the total order
//! on activation keys. The final tie-break exists purely so the ordering is
//! total: identical inputs produce identical firing sequences no matter how
//! the caller ordered its assertions.
//!
//! The agenda is recomputed from scratch whenever a firing asserts new facts.
//! With rule tables and fact counts this size, the full re-evaluation is
//! cheaper than maintaining incremental per-kind dependency sets.

use std::collections::{HashMap, HashSet};

use crate::fact::FieldValue;
use crate::matcher::{evaluate, Bindings};
use crate::rule::RuleSet;
use crate::store::FactStore;

// ---------------------------------------------------------------------------
// Activation identity
// ---------------------------------------------------------------------------

/// Identity of a concrete rule satisfaction: which rule, under which literal
/// bindings, through which `any` branches. The firing history is keyed on
/// this, so a rule never re-fires for the same concrete satisfaction within
/// one engine lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActivationKey {
    /// Index into the rule table (declaration order).
    pub rule: usize,
    /// Sorted `(name, value)` binding signature.
    pub bindings: Vec<(String, FieldValue)>,
    /// `any`-branch trail distinguishing guard shapes.
    pub branch: Vec<u32>,
}

/// A pending `(rule, binding)` pair eligible to fire.
#[derive(Debug, Clone)]
pub struct Activation {
    pub key: ActivationKey,
    pub salience: i32,
    /// Highest assertion epoch among the supporting facts.
    pub recency: u64,
    pub bindings: Bindings,
}

// ---------------------------------------------------------------------------
// Agenda
// ---------------------------------------------------------------------------

/// Pending activations, kept sorted best-first.
#[derive(Debug, Default)]
pub struct Agenda {
    queue: Vec<Activation>,
}

impl Agenda {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the agenda from the current store, skipping activations whose
    /// key is already in the firing history. Matches that collapse to the
    /// same key keep the most recent supporting-fact epoch.
    pub fn refresh(&mut self, rules: &RuleSet, store: &FactStore, fired: &HashSet<ActivationKey>) {
        let mut pending: HashMap<ActivationKey, Activation> = HashMap::new();

        for (index, rule) in rules.iter().enumerate() {
            for m in evaluate(&rule.condition, store) {
                let key = ActivationKey {
                    rule: index,
                    bindings: m.bindings.signature(),
                    branch: m.branch.clone(),
                };
                if fired.contains(&key) {
                    continue;
                }
                let recency = m
                    .facts
                    .iter()
                    .map(|&id| store.stamp(id))
                    .max()
                    .unwrap_or(0);
                pending
                    .entry(key.clone())
                    .and_modify(|a| a.recency = a.recency.max(recency))
                    .or_insert(Activation {
                        key,
                        salience: rule.salience,
                        recency,
                        bindings: m.bindings,
                    });
            }
        }

        self.queue = pending.into_values().collect();
        self.queue.sort_by(|a, b| {
            b.salience
                .cmp(&a.salience)
                .then(b.recency.cmp(&a.recency))
                .then(a.key.rule.cmp(&b.key.rule))
                .then(a.key.cmp(&b.key))
        });
    }

    /// Remove and return the highest-priority activation.
    pub fn pop(&mut self) -> Option<Activation> {
        if self.queue.is_empty() {
            None
        } else {
            Some(self.queue.remove(0))
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::FactPattern;
    use crate::engine::ActionContext;
    use crate::fact::{FactKind, Symptom};
    use crate::rule::{Rule, RuleSet};

    fn noop(_: &mut ActionContext<'_>) {}

    fn rule(name: &str, symptom: &str, salience: i32) -> Rule {
        Rule::new(
            name,
            FactPattern::of(FactKind::Symptom).with_eq("name", symptom),
            noop,
        )
        .with_salience(salience)
    }

    #[test]
    fn salience_orders_activations() {
        let rules = RuleSet::build(vec![
            rule("low", "fever", 10),
            rule("high", "fever", 100),
        ])
        .unwrap();
        let mut store = FactStore::new();
        store.assert(Symptom::new("fever").into());

        let mut agenda = Agenda::new();
        agenda.refresh(&rules, &store, &HashSet::new());
        assert_eq!(agenda.len(), 2);
        assert_eq!(rules.get(agenda.pop().unwrap().key.rule).name, "high");
    }

    #[test]
    fn recency_breaks_salience_ties() {
        let rules = RuleSet::build(vec![
            rule("older", "fever", 50),
            rule("newer", "chills", 50),
        ])
        .unwrap();
        let mut store = FactStore::new();
        store.assert(Symptom::new("fever").into());
        store.advance_epoch();
        store.assert(Symptom::new("chills").into());

        let mut agenda = Agenda::new();
        agenda.refresh(&rules, &store, &HashSet::new());
        assert_eq!(rules.get(agenda.pop().unwrap().key.rule).name, "newer");
    }

    #[test]
    fn declaration_order_breaks_remaining_ties() {
        let rules = RuleSet::build(vec![
            rule("first", "fever", 50),
            rule("second", "fever", 50),
        ])
        .unwrap();
        let mut store = FactStore::new();
        store.assert(Symptom::new("fever").into());

        let mut agenda = Agenda::new();
        agenda.refresh(&rules, &store, &HashSet::new());
        assert_eq!(rules.get(agenda.pop().unwrap().key.rule).name, "first");
    }

    #[test]
    fn fired_keys_are_excluded() {
        let rules = RuleSet::build(vec![rule("only", "fever", 0)]).unwrap();
        let mut store = FactStore::new();
        store.assert(Symptom::new("fever").into());

        let mut agenda = Agenda::new();
        agenda.refresh(&rules, &store, &HashSet::new());
        let activation = agenda.pop().unwrap();

        let mut fired = HashSet::new();
        fired.insert(activation.key);
        agenda.refresh(&rules, &store, &fired);
        assert!(agenda.is_empty());
    }

    #[test]
    fn same_key_matches_collapse() {
        // Two distinct fever facts, a rule binding nothing: one activation.
        let rules = RuleSet::build(vec![rule("only", "fever", 0)]).unwrap();
        let mut store = FactStore::new();
        store.assert(Symptom::new("fever").into());
        store.assert(Symptom::new("fever").with_duration_days(3).into());

        let mut agenda = Agenda::new();
        agenda.refresh(&rules, &store, &HashSet::new());
        assert_eq!(agenda.len(), 1);
    }
}
