//! Rule descriptors and the rule table.
//!
//! Rules are plain data built once at setup: a name, a salience, a condition
//! tree and an action closure. The table's declaration order is part of the
//! conflict-resolution contract (it breaks salience/recency ties), so a
//! `RuleSet` is constructed from an ordered `Vec` and never reordered.
//! Construction validates every guard against the fact schemas; an unknown
//! field is a configuration error surfaced immediately, not a silent
//! never-matching condition.

use std::fmt;
use std::sync::Arc;

use crate::condition::Condition;
use crate::engine::ActionContext;
use crate::error::RuleError;

/// Effect executed when a rule fires. Actions reach working memory and the
/// output channel only through the [`ActionContext`] capability.
pub type Action = Arc<dyn Fn(&mut ActionContext<'_>) + Send + Sync>;

/// A single forward-chaining rule.
#[derive(Clone)]
pub struct Rule {
    pub name: String,
    pub salience: i32,
    pub condition: Condition,
    pub action: Action,
}

impl Rule {
    /// Create a rule with the default salience of 0.
    pub fn new<F>(name: impl Into<String>, condition: impl Into<Condition>, action: F) -> Self
    where
        F: Fn(&mut ActionContext<'_>) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            salience: 0,
            condition: condition.into(),
            action: Arc::new(action),
        }
    }

    /// Set the salience. Higher fires first.
    pub fn with_salience(mut self, salience: i32) -> Self {
        self.salience = salience;
        self
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("salience", &self.salience)
            .field("condition", &self.condition)
            .finish_non_exhaustive()
    }
}

/// An ordered, validated rule table. Immutable after construction and shared
/// read-only across engine instances.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Validate and freeze a rule table. Declaration order is preserved.
    pub fn build(rules: Vec<Rule>) -> Result<Self, RuleError> {
        let mut seen = std::collections::HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.name.clone()) {
                return Err(RuleError::DuplicateName {
                    name: rule.name.clone(),
                });
            }
            rule.condition.validate(&rule.name)?;
        }
        Ok(Self { rules })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn get(&self, index: usize) -> &Rule {
        &self.rules[index]
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
