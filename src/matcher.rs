//! Pattern matcher: evaluates a condition tree against the fact store.
//!
//! Evaluation produces zero or more [`Match`]es, each carrying the binding
//! environment that satisfies the condition, the facts it touched (for
//! recency ordering) and the trail of `any`-branch choices (for activation
//! identity). `all` joins sub-matches pairwise, discarding joins where a
//! bound name would take two different values. `not` is negation as failure:
//! the inner condition is evaluated in isolation against the current store,
//! and a single satisfier anywhere defeats the `not` for all outer matches.
//!
//! Constraints on absent fields fail the candidate fact — for predicates as
//! much as for literals, so a rule author's closure can never observe a
//! missing value, let alone crash on one.

use std::collections::BTreeMap;

use crate::condition::{Condition, FactPattern, FieldTest};
use crate::fact::FieldValue;
use crate::store::{FactId, FactStore};

// ---------------------------------------------------------------------------
// Binding environment
// ---------------------------------------------------------------------------

/// An assignment of bound names to concrete values.
///
/// Backed by an ordered map so a signature of the environment is stable
/// regardless of the order bindings were established in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings(BTreeMap<String, FieldValue>);

impl Bindings {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// Bind `name` to `value`; fails (returning false) if `name` is already
    /// bound to a different value.
    pub fn bind(&mut self, name: &str, value: FieldValue) -> bool {
        match self.0.get(name) {
            Some(existing) => *existing == value,
            None => {
                self.0.insert(name.to_string(), value);
                true
            }
        }
    }

    /// Merge another environment in; `None` on any conflicting name.
    pub fn merged(&self, other: &Bindings) -> Option<Bindings> {
        let mut out = self.clone();
        for (name, value) in &other.0 {
            if !out.bind(name, value.clone()) {
                return None;
            }
        }
        Some(out)
    }

    /// The environment as a sorted `(name, value)` list.
    pub fn signature(&self) -> Vec<(String, FieldValue)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// One way the current store satisfies a condition.
#[derive(Debug, Clone)]
pub struct Match {
    /// Names bound while matching, consistent across all joined patterns.
    pub bindings: Bindings,
    /// The facts this match rests on. Empty for a pure `not` success.
    pub facts: Vec<FactId>,
    /// Indices of the `any` branches taken, in traversal order. Two matches
    /// reached through different branches are distinct activations even when
    /// their bindings coincide.
    pub branch: Vec<u32>,
}

impl Match {
    fn empty() -> Self {
        Self {
            bindings: Bindings::default(),
            facts: Vec::new(),
            branch: Vec::new(),
        }
    }

    /// Join two matches, requiring binding consistency.
    fn join(&self, other: &Match) -> Option<Match> {
        let bindings = self.bindings.merged(&other.bindings)?;
        let mut facts = self.facts.clone();
        facts.extend_from_slice(&other.facts);
        let mut branch = self.branch.clone();
        branch.extend_from_slice(&other.branch);
        Some(Match {
            bindings,
            facts,
            branch,
        })
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate a condition tree against the store, producing every satisfying
/// match.
pub fn evaluate(condition: &Condition, store: &FactStore) -> Vec<Match> {
    match condition {
        Condition::Pattern(pattern) => match_pattern(pattern, store),
        Condition::Not(inner) => {
            if evaluate(inner, store).is_empty() {
                vec![Match::empty()]
            } else {
                Vec::new()
            }
        }
        Condition::All(subs) => {
            let mut acc = vec![Match::empty()];
            for sub in subs {
                let sub_matches = evaluate(sub, store);
                let mut next = Vec::new();
                for left in &acc {
                    for right in &sub_matches {
                        if let Some(joined) = left.join(right) {
                            next.push(joined);
                        }
                    }
                }
                acc = next;
                if acc.is_empty() {
                    break;
                }
            }
            acc
        }
        Condition::Any(subs) => {
            let mut out = Vec::new();
            for (idx, sub) in subs.iter().enumerate() {
                for mut m in evaluate(sub, store) {
                    m.branch.insert(0, idx as u32);
                    out.push(m);
                }
            }
            out
        }
    }
}

/// Match a leaf pattern: every constraint applied to the same candidate fact.
fn match_pattern(pattern: &FactPattern, store: &FactStore) -> Vec<Match> {
    let mut out = Vec::new();
    'facts: for (id, fact) in store.facts_of(pattern.kind) {
        let mut bindings = Bindings::default();
        for constraint in &pattern.constraints {
            // Absent field: the constraint fails, the predicate never runs.
            let Some(value) = fact.field(&constraint.field) else {
                continue 'facts;
            };
            let ok = match &constraint.test {
                FieldTest::Equals(want) => value == *want,
                FieldTest::Predicate(test) => test(&value),
                FieldTest::Wildcard => true,
                FieldTest::Bind(name) => bindings.bind(name, value),
            };
            if !ok {
                continue 'facts;
            }
        }
        out.push(Match {
            bindings,
            facts: vec![id],
            branch: Vec::new(),
        });
    }
    out
}
