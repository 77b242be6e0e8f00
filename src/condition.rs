//! Declarative rule guards.
//!
//! A condition is a tree: leaf [`FactPattern`]s match a single fact of one
//! kind field-by-field, `all`/`any` compose sub-conditions, and `not`
//! succeeds only when nothing in the store satisfies the inner condition
//! (negation as failure, re-checked against the current store every time).
//!
//! Field tests on one pattern all apply to the *same* candidate fact; to
//! relate values across different facts, bind a field under a name with
//! [`FactPattern::with_bind`] — the matcher keeps only joins where every
//! occurrence of a name carries the same value.

use std::fmt;
use std::sync::Arc;

use crate::error::RuleError;
use crate::fact::{FactKind, FieldValue};

// ---------------------------------------------------------------------------
// Field tests
// ---------------------------------------------------------------------------

/// Boolean test over a present field value.
///
/// Predicates never see an absent field: the matcher resolves a missing
/// field as "constraint not satisfied" before the closure runs.
pub type Predicate = Arc<dyn Fn(&FieldValue) -> bool + Send + Sync>;

/// A test applied to one named field of a candidate fact.
#[derive(Clone)]
pub enum FieldTest {
    /// Field is present and equal to the literal.
    Equals(FieldValue),
    /// Field is present and the predicate returns true.
    Predicate(Predicate),
    /// Field is present, any value.
    Wildcard,
    /// Field is present; record its value under the given name for
    /// cross-pattern comparison.
    Bind(String),
}

impl fmt::Debug for FieldTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals(v) => write!(f, "Equals({v})"),
            Self::Predicate(_) => write!(f, "Predicate(..)"),
            Self::Wildcard => write!(f, "Wildcard"),
            Self::Bind(name) => write!(f, "Bind({name})"),
        }
    }
}

/// A named field plus the test applied to it.
#[derive(Debug, Clone)]
pub struct FieldConstraint {
    pub field: String,
    pub test: FieldTest,
}

// ---------------------------------------------------------------------------
// Fact patterns
// ---------------------------------------------------------------------------

/// A leaf condition: one fact of `kind` satisfying every constraint.
#[derive(Debug, Clone)]
pub struct FactPattern {
    pub kind: FactKind,
    pub constraints: Vec<FieldConstraint>,
}

impl FactPattern {
    /// A pattern matching any fact of the given kind.
    pub fn of(kind: FactKind) -> Self {
        Self {
            kind,
            constraints: Vec::new(),
        }
    }

    /// Require `field` to equal `value`.
    pub fn with_eq(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.constraints.push(FieldConstraint {
            field: field.into(),
            test: FieldTest::Equals(value.into()),
        });
        self
    }

    /// Require `field` to be present and satisfy `test`.
    pub fn with_test<F>(mut self, field: impl Into<String>, test: F) -> Self
    where
        F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
    {
        self.constraints.push(FieldConstraint {
            field: field.into(),
            test: FieldTest::Predicate(Arc::new(test)),
        });
        self
    }

    /// Require `field` to be present with any value.
    pub fn with_wildcard(mut self, field: impl Into<String>) -> Self {
        self.constraints.push(FieldConstraint {
            field: field.into(),
            test: FieldTest::Wildcard,
        });
        self
    }

    /// Require `field` to be present and bind its value under `name`.
    pub fn with_bind(mut self, field: impl Into<String>, name: impl Into<String>) -> Self {
        self.constraints.push(FieldConstraint {
            field: field.into(),
            test: FieldTest::Bind(name.into()),
        });
        self
    }
}

// ---------------------------------------------------------------------------
// Condition tree
// ---------------------------------------------------------------------------

/// A node in a rule's guard.
#[derive(Debug, Clone)]
pub enum Condition {
    /// One fact satisfying a pattern.
    Pattern(FactPattern),
    /// Succeeds iff the inner condition has no satisfier in the current
    /// store. Evaluated in isolation; contributes no bindings.
    Not(Box<Condition>),
    /// All sub-conditions hold with a consistent binding environment.
    All(Vec<Condition>),
    /// At least one sub-condition holds; each satisfying branch is a
    /// distinct activation.
    Any(Vec<Condition>),
}

impl Condition {
    pub fn all(conditions: Vec<Condition>) -> Self {
        Self::All(conditions)
    }

    pub fn any(conditions: Vec<Condition>) -> Self {
        Self::Any(conditions)
    }

    pub fn not(condition: impl Into<Condition>) -> Self {
        Self::Not(Box::new(condition.into()))
    }

    /// Verify every referenced field exists in its kind's schema.
    /// Called once at rule-set construction; a failure is a configuration
    /// error, not a match-time condition failure.
    pub fn validate(&self, rule: &str) -> Result<(), RuleError> {
        match self {
            Self::Pattern(p) => {
                for c in &p.constraints {
                    if !p.kind.has_field(&c.field) {
                        return Err(RuleError::UnknownField {
                            rule: rule.to_string(),
                            kind: p.kind,
                            field: c.field.clone(),
                        });
                    }
                }
                Ok(())
            }
            Self::Not(inner) => inner.validate(rule),
            Self::All(subs) | Self::Any(subs) => {
                for sub in subs {
                    sub.validate(rule)?;
                }
                Ok(())
            }
        }
    }
}

impl From<FactPattern> for Condition {
    fn from(pattern: FactPattern) -> Self {
        Self::Pattern(pattern)
    }
}
