//! Engine-level properties checked against both the clinical table and
//! small synthetic rule sets: determinism under assertion order,
//! idempotence, negation timing, salience precedence and the one-to-one
//! correspondence between derived facts and emitted records.

use std::sync::Arc;

use daktari::engine::{ActionContext, Engine};
use daktari::condition::{Condition, FactPattern};
use daktari::error::EngineError;
use daktari::fact::{Confidence, Diagnosis, Fact, FactKind, FieldValue, LabResult, Patient, Symptom};
use daktari::output::RecommendationKind;
use daktari::rule::{Rule, RuleSet};
use daktari::rules;

fn clinical() -> Arc<RuleSet> {
    Arc::new(rules::clinical_rules().unwrap())
}

fn run_with(table: Arc<RuleSet>, facts: &[Fact]) -> Engine {
    let mut engine = Engine::new(table);
    for f in facts {
        engine.assert(f.clone());
    }
    engine.run().unwrap();
    engine
}

fn permutations(facts: &[Fact]) -> Vec<Vec<Fact>> {
    fn go(current: &mut Vec<Fact>, rest: &mut Vec<Fact>, out: &mut Vec<Vec<Fact>>) {
        if rest.is_empty() {
            out.push(current.clone());
            return;
        }
        for i in 0..rest.len() {
            let item = rest.remove(i);
            current.push(item);
            go(current, rest, out);
            let item = current.pop().unwrap();
            rest.insert(i, item);
        }
    }
    let mut out = Vec::new();
    go(&mut Vec::new(), &mut facts.to_vec(), &mut out);
    out
}

#[test]
fn identical_facts_in_any_order_produce_identical_output() {
    let facts: Vec<Fact> = vec![
        Patient::new().with_travel_endemic_area(true).into(),
        Symptom::new("fever").with_present(true).with_pattern("cyclical").into(),
        Symptom::new("chills").with_present(true).into(),
        Symptom::new("sweating").with_present(true).into(),
    ];

    let reference = run_with(clinical(), &facts);
    let expected: Vec<_> = reference.diagnoses().cloned().collect();
    let expected_recs: Vec<_> = reference.recommendations().cloned().collect();

    for order in permutations(&facts) {
        let engine = run_with(clinical(), &order);
        let got: Vec<_> = engine.diagnoses().cloned().collect();
        let got_recs: Vec<_> = engine.recommendations().cloned().collect();
        assert_eq!(got, expected);
        assert_eq!(got_recs, expected_recs);
    }
}

#[test]
fn repeated_runs_are_reproducible() {
    let facts: Vec<Fact> = vec![
        Symptom::new("diarrhea").with_present(true).with_description("rice_water").into(),
        Symptom::new("dehydration").with_present(true).with_severity("severe").into(),
        LabResult::new("stool_culture")
            .with_result("positive")
            .with_details("vibrio cholerae")
            .into(),
    ];
    let first: Vec<_> = run_with(clinical(), &facts).diagnoses().cloned().collect();
    for _ in 0..5 {
        let again: Vec<_> = run_with(clinical(), &facts).diagnoses().cloned().collect();
        assert_eq!(again, first);
    }
}

#[test]
fn duplicate_input_facts_never_duplicate_output() {
    let mut engine = Engine::new(clinical());
    engine.assert(Symptom::new("fever").with_present(true));
    engine.assert(Symptom::new("fever").with_present(true));
    engine.run().unwrap();
    assert_eq!(engine.diagnoses().count(), 1);
}

#[test]
fn not_guard_satisfied_before_run_blocks_the_rule() {
    // A malaria diagnosis asserted up front keeps every Not(malaria)-guarded
    // rule quiet for the whole run.
    let mut engine = Engine::new(clinical());
    engine.assert(Symptom::new("fever").with_present(true));
    engine.assert(Symptom::new("headache").with_present(true));
    engine.assert(Patient::new().with_travel_endemic_area(true));
    engine.assert(Diagnosis::new("malaria", Confidence::Confirmed, "prior confirmation"));
    engine.run().unwrap();

    // The suspicion rule (salience 65, guarded by Not(Diagnosis(malaria)))
    // must not add anything beyond the pre-asserted fact.
    assert_eq!(engine.facts_of(FactKind::Diagnosis).count(), 1);
    // The pre-asserted diagnosis was caller input, not a rule emission.
    assert_eq!(engine.diagnoses().count(), 0);
}

#[test]
fn fired_binding_never_fires_again() {
    // After "target" fires for the empty binding, "refresher" asserts a new
    // fact that still satisfies target's guard; the firing history blocks a
    // second firing.
    let table = Arc::new(
        RuleSet::build(vec![
            Rule::new(
                "target",
                FactPattern::of(FactKind::Symptom).with_eq("name", "fever"),
                |ctx: &mut ActionContext| {
                    ctx.diagnose(Diagnosis::new("seen", Confidence::Uncertain, "fever observed"));
                },
            )
            .with_salience(10),
            Rule::new(
                "refresher",
                FactPattern::of(FactKind::Symptom).with_eq("name", "fever"),
                |ctx: &mut ActionContext| {
                    ctx.assert(Symptom::new("fever").with_duration_days(2));
                },
            ),
        ])
        .unwrap(),
    );
    let mut engine = Engine::new(table);
    engine.assert(Symptom::new("fever"));
    engine.run().unwrap();
    assert_eq!(engine.diagnoses().count(), 1);
}

#[test]
fn higher_salience_with_not_guard_wins_outright() {
    let table = Arc::new(
        RuleSet::build(vec![
            Rule::new(
                "confirm",
                FactPattern::of(FactKind::LabResult).with_eq("result", "positive"),
                |ctx: &mut ActionContext| {
                    ctx.diagnose(Diagnosis::new("m", Confidence::Confirmed, "lab"));
                },
            )
            .with_salience(100),
            Rule::new(
                "suspect",
                Condition::all(vec![
                    FactPattern::of(FactKind::Symptom).with_eq("name", "fever").into(),
                    Condition::not(FactPattern::of(FactKind::Diagnosis).with_eq("disease", "m")),
                ]),
                |ctx: &mut ActionContext| {
                    ctx.diagnose(Diagnosis::new("m", Confidence::Suspect, "clinical"));
                },
            )
            .with_salience(65),
        ])
        .unwrap(),
    );
    let mut engine = Engine::new(table);
    engine.assert(Symptom::new("fever"));
    engine.assert(LabResult::new("smear").with_result("positive"));
    engine.run().unwrap();

    let diagnoses: Vec<_> = engine.diagnoses().collect();
    assert_eq!(diagnoses.len(), 1);
    assert_eq!(diagnoses[0].confidence, Confidence::Confirmed);
}

#[test]
fn runaway_ruleset_errors_instead_of_hanging() {
    let table = Arc::new(
        RuleSet::build(vec![Rule::new(
            "self-feeder",
            FactPattern::of(FactKind::Symptom).with_bind("name", "n"),
            |ctx: &mut ActionContext| {
                let next = match ctx.binding("n") {
                    Some(FieldValue::Str(s)) => format!("{s}'"),
                    _ => "'".into(),
                };
                ctx.assert(Symptom::new(next));
            },
        )])
        .unwrap(),
    );
    let mut engine = Engine::new(table);
    engine.assert(Symptom::new("seed"));
    let err = engine.run().unwrap_err();
    assert!(matches!(err, EngineError::NoConvergence { .. }));
}

#[test]
fn derived_facts_and_emissions_stay_one_to_one() {
    // Diagnosis facts asserted by rules must equal diagnosis records
    // emitted, and severity-indicator facts must equal urgent
    // recommendations — across a run that exercises both paths.
    let mut engine = Engine::new(clinical());
    engine.assert(Symptom::new("fever").with_present(true).with_pattern("stepladder"));
    engine.assert(Symptom::new("relative_bradycardia").with_present(true));
    engine.assert(Symptom::new("melena").with_present(true));
    engine.assert(Symptom::new("convulsions").with_present(true));
    engine.run().unwrap();

    let diagnosis_facts = engine.facts_of(FactKind::Diagnosis).count();
    assert_eq!(diagnosis_facts, engine.diagnoses().count());

    let severity_facts = engine.facts_of(FactKind::SeverityIndicator).count();
    let urgent = engine
        .recommendations()
        .filter(|r| r.kind == RecommendationKind::Urgent)
        .count();
    assert_eq!(severity_facts, urgent);
    assert!(severity_facts >= 2); // intestinal complication + cerebral signs
}
