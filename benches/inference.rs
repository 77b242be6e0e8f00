//! Benchmarks for the forward-chaining inference loop.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use std::sync::Arc;

use daktari::engine::Engine;
use daktari::fact::{DehydrationSign, LabResult, Patient, Symptom};
use daktari::rule::RuleSet;
use daktari::rules;

fn table() -> Arc<RuleSet> {
    Arc::new(rules::clinical_rules().unwrap())
}

fn bench_paroxysm(c: &mut Criterion) {
    let table = table();
    c.bench_function("diagnose_malaria_paroxysm", |b| {
        b.iter(|| {
            let mut engine = Engine::new(Arc::clone(&table));
            engine.assert(Patient::new().with_travel_endemic_area(true));
            engine.assert(Symptom::new("fever").with_present(true).with_pattern("cyclical"));
            engine.assert(Symptom::new("chills").with_present(true));
            engine.assert(Symptom::new("sweating").with_present(true));
            engine.run().unwrap();
            black_box(engine.diagnoses().count())
        })
    });
}

fn bench_cholera_with_labs(c: &mut Criterion) {
    let table = table();
    c.bench_function("diagnose_cholera_confirmed", |b| {
        b.iter(|| {
            let mut engine = Engine::new(Arc::clone(&table));
            engine.assert(
                Symptom::new("diarrhea")
                    .with_present(true)
                    .with_description("rice_water"),
            );
            engine.assert(
                Symptom::new("dehydration")
                    .with_present(true)
                    .with_severity("severe"),
            );
            engine.assert(
                LabResult::new("stool_culture")
                    .with_result("positive")
                    .with_details("vibrio cholerae"),
            );
            engine.run().unwrap();
            black_box(engine.diagnoses().count())
        })
    });
}

fn bench_wide_presentation(c: &mut Criterion) {
    // A presentation touching every rule group: dehydration signs, symptoms
    // across all three diseases and two lab results.
    let table = table();
    c.bench_function("diagnose_wide_presentation", |b| {
        b.iter(|| {
            let mut engine = Engine::new(Arc::clone(&table));
            engine.assert(Patient::new().with_travel_endemic_area(true).with_unsafe_water(true));
            engine.assert(Symptom::new("fever").with_present(true).with_duration_days(6));
            engine.assert(Symptom::new("headache").with_present(true));
            engine.assert(Symptom::new("abdominal_pain").with_present(true));
            engine.assert(Symptom::new("diarrhea").with_present(true).with_severity("moderate"));
            engine.assert(Symptom::new("vomiting").with_present(true));
            engine.assert(DehydrationSign::new("mental_state", "restless"));
            engine.assert(DehydrationSign::new("thirst", "drinks_eagerly"));
            engine.assert(DehydrationSign::new("skin_pinch", "slow"));
            engine.assert(LabResult::new("widal").with_result("positive").with_details("1:320"));
            engine.assert(LabResult::new("rdt_malaria").with_result("positive"));
            engine.run().unwrap();
            black_box(engine.output().len())
        })
    });
}

criterion_group!(
    benches,
    bench_paroxysm,
    bench_cholera_with_labs,
    bench_wide_presentation
);
criterion_main!(benches);
