//! The built-in clinical rule table: cholera, malaria and typhoid fever plus
//! the WHO dehydration classification.
//!
//! Everything here is *data* riding on the generic engine — condition trees,
//! saliences and action closures registered in a fixed order. Declaration
//! order matters: it is the final conflict-resolution tie-break, and the
//! groups below are registered in the order the protocol authors wrote them
//! (dehydration, cholera, malaria, typhoid, fallbacks, differentials).
//!
//! Salience bands: 100 laboratory confirmations and danger signs, 85–95
//! pathognomonic clinical pictures, 50–80 clinical suspicion, 10 uncertainty
//! fallbacks.

mod cholera;
mod dehydration;
mod differential;
mod malaria;
mod typhoid;

use std::sync::Arc;

use crate::condition::FactPattern;
use crate::engine::{Engine, RunSummary};
use crate::error::{DaktariResult, RuleError};
use crate::fact::{Fact, FactKind, FieldValue};
use crate::output::{DiagnosisRecord, Recommendation};
use crate::rule::RuleSet;

/// Build the complete clinical rule table.
///
/// The table is immutable and intended to be wrapped in an `Arc` once at
/// service start and shared across every per-request engine.
pub fn clinical_rules() -> Result<RuleSet, RuleError> {
    let mut rules = Vec::new();
    rules.extend(dehydration::rules());
    rules.extend(cholera::rules());
    rules.extend(malaria::rules());
    rules.extend(typhoid::rules());
    rules.extend(differential::rules());
    RuleSet::build(rules)
}

// ---------------------------------------------------------------------------
// One-shot convenience
// ---------------------------------------------------------------------------

/// Result of a one-shot diagnostic run.
#[derive(Debug, Clone)]
pub struct DiagnosisReport {
    pub diagnoses: Vec<DiagnosisRecord>,
    pub recommendations: Vec<Recommendation>,
    pub summary: RunSummary,
}

/// Run one diagnosis over a shared rule table: fresh engine, assert the
/// inputs, drive to fixpoint, collect the output.
pub fn diagnose(
    table: Arc<RuleSet>,
    facts: impl IntoIterator<Item = Fact>,
) -> DaktariResult<DiagnosisReport> {
    let mut engine = Engine::new(table);
    for fact in facts {
        engine.assert(fact);
    }
    let summary = engine.run()?;
    Ok(DiagnosisReport {
        diagnoses: engine.diagnoses().cloned().collect(),
        recommendations: engine.recommendations().cloned().collect(),
        summary,
    })
}

// ---------------------------------------------------------------------------
// Shared pattern helpers
// ---------------------------------------------------------------------------

/// A present symptom by name.
pub(crate) fn sym(name: &'static str) -> FactPattern {
    FactPattern::of(FactKind::Symptom)
        .with_eq("name", name)
        .with_eq("present", true)
}

/// A symptom by name, regardless of the `present` flag.
pub(crate) fn sym_any(name: &'static str) -> FactPattern {
    FactPattern::of(FactKind::Symptom).with_eq("name", name)
}

/// A positive lab result for the given test.
pub(crate) fn lab_positive(test: &'static str) -> FactPattern {
    FactPattern::of(FactKind::LabResult)
        .with_eq("test", test)
        .with_eq("result", "positive")
}

/// A dehydration-assessment sign with a specific finding.
pub(crate) fn sign(sign: &'static str, finding: &'static str) -> FactPattern {
    FactPattern::of(FactKind::DehydrationSign)
        .with_eq("sign", sign)
        .with_eq("finding", finding)
}

/// A patient with the given boolean flag set.
pub(crate) fn patient_flag(field: &'static str) -> FactPattern {
    FactPattern::of(FactKind::Patient).with_eq(field, true)
}

/// An already-derived diagnosis for the disease, any confidence.
pub(crate) fn diagnosed(disease: &'static str) -> FactPattern {
    FactPattern::of(FactKind::Diagnosis).with_eq("disease", disease)
}

// ---------------------------------------------------------------------------
// Shared predicate helpers
// ---------------------------------------------------------------------------

/// String value among a fixed set of options.
pub(crate) fn one_of(options: &'static [&'static str]) -> impl Fn(&FieldValue) -> bool {
    move |v| matches!(v, FieldValue::Str(s) if options.contains(&s.as_str()))
}

/// String value containing the needle, case-insensitive.
pub(crate) fn contains_ci(needle: &'static str) -> impl Fn(&FieldValue) -> bool {
    move |v| matches!(v, FieldValue::Str(s) if s.to_lowercase().contains(needle))
}

/// String value containing any of the needles, case-sensitive.
pub(crate) fn contains_any(needles: &'static [&'static str]) -> impl Fn(&FieldValue) -> bool {
    move |v| matches!(v, FieldValue::Str(s) if needles.iter().any(|n| s.contains(n)))
}

/// Integer value of at least `min`.
pub(crate) fn at_least(min: i64) -> impl Fn(&FieldValue) -> bool {
    move |v| matches!(v, FieldValue::Int(n) if *n >= min)
}
