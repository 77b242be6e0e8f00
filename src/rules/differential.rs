//! Uncertainty fallbacks and differential tie-breakers.
//!
//! The fallbacks run at salience 10, after every specific rule has had its
//! chance; their `not` guard on any existing diagnosis keeps them quiet the
//! moment something concrete has fired. Differential notes are advisory
//! emissions only and assert no facts.

use crate::condition::{Condition, FactPattern};
use crate::engine::ActionContext;
use crate::fact::{Confidence, Diagnosis, FactKind};
use crate::rule::Rule;

use super::{sym, sym_any};

fn no_diagnosis_yet() -> Condition {
    Condition::not(FactPattern::of(FactKind::Diagnosis).with_wildcard("disease"))
}

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "fallback-fever-uncertain",
            Condition::all(vec![sym("fever").into(), no_diagnosis_yet()]),
            |ctx: &mut ActionContext| {
                ctx.diagnose(
                    Diagnosis::new(
                        "uncertain",
                        Confidence::Uncertain,
                        "Fever present but symptoms do not clearly match cholera, malaria, or typhoid patterns",
                    )
                    .with_recommendation(
                        "Blood smear, malaria RDT, blood culture recommended. Reassess in 24 hours.",
                    ),
                );
            },
        )
        .with_salience(10),
        Rule::new(
            "fallback-diarrhea-uncertain",
            Condition::all(vec![
                sym("diarrhea").into(),
                Condition::not(sym_any("diarrhea").with_eq("description", "rice_water")),
                no_diagnosis_yet(),
            ]),
            |ctx: &mut ActionContext| {
                ctx.diagnose(
                    Diagnosis::new(
                        "uncertain",
                        Confidence::Uncertain,
                        "Diarrhea present but does not have cholera-specific features",
                    )
                    .with_recommendation(
                        "Stool culture recommended. Consider other causes of gastroenteritis.",
                    ),
                );
            },
        )
        .with_salience(10),
        Rule::new(
            "differential-typhoid-constipation",
            Condition::all(vec![
                sym("fever").with_eq("pattern", "cyclical").into(),
                sym("constipation").into(),
            ]),
            |ctx: &mut ActionContext| {
                ctx.differential("Constipation with fever favors typhoid over malaria");
            },
        )
        .with_salience(75),
        Rule::new(
            "differential-malaria-anemia",
            Condition::all(vec![
                sym("fever").into(),
                sym("anemia").with_eq("severity", "severe").into(),
            ]),
            |ctx: &mut ActionContext| {
                ctx.differential("Severe anemia with fever strongly favors malaria");
            },
        )
        .with_salience(75),
    ]
}
