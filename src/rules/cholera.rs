//! Cholera rules.
//!
//! Rice-water stool is pathognomonic; acute watery diarrhea with vomiting in
//! an exposed patient is only suspicion and asks for lab confirmation. A
//! positive stool culture for V. cholerae trumps everything (salience 100).

use crate::condition::{Condition, FactPattern};
use crate::engine::ActionContext;
use crate::fact::{Confidence, Diagnosis, FactKind};
use crate::rule::Rule;

use super::{contains_ci, diagnosed, lab_positive, one_of, patient_flag, sym, sym_any};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "cholera-ricewater-severe",
            Condition::all(vec![
                sym("diarrhea").with_eq("description", "rice_water").into(),
                sym("dehydration").with_eq("severity", "severe").into(),
            ]),
            |ctx: &mut ActionContext| {
                ctx.diagnose(
                    Diagnosis::new(
                        "cholera",
                        Confidence::Confident,
                        "Rice-water stool with severe dehydration is pathognomonic for cholera",
                    )
                    .with_severity("severe"),
                );
            },
        )
        .with_salience(90),
        Rule::new(
            "cholera-ricewater",
            Condition::all(vec![
                sym("diarrhea").with_eq("description", "rice_water").into(),
                Condition::not(sym("dehydration").with_eq("severity", "severe")),
            ]),
            |ctx: &mut ActionContext| {
                ctx.diagnose(
                    Diagnosis::new(
                        "cholera",
                        Confidence::Confident,
                        "Rice-water stool is pathognomonic for cholera",
                    )
                    .with_severity("uncomplicated"),
                );
            },
        )
        .with_salience(85),
        Rule::new(
            "cholera-suspect-endemic",
            Condition::all(vec![
                sym("diarrhea")
                    .with_test("severity", one_of(&["moderate", "severe"]))
                    .into(),
                // Watery-looking stool, or no diarrhea observation describes
                // the stool at all. Rice-water stool goes to the rules above.
                Condition::any(vec![
                    sym("diarrhea")
                        .with_test("description", one_of(&["watery", "acute_watery"]))
                        .into(),
                    Condition::not(sym_any("diarrhea").with_wildcard("description")),
                ]),
                sym("vomiting").into(),
                Condition::any(vec![
                    patient_flag("endemic_resident").into(),
                    patient_flag("unsafe_water").into(),
                ]),
                Condition::not(diagnosed("cholera")),
            ]),
            |ctx: &mut ActionContext| {
                ctx.diagnose(
                    Diagnosis::new(
                        "cholera",
                        Confidence::Suspect,
                        "Acute watery diarrhea with vomiting in endemic area/unsafe water exposure",
                    )
                    .with_recommendation("Confirm with stool culture or RDT (Crystal VC)"),
                );
            },
        )
        .with_salience(70),
        Rule::new(
            "cholera-confirmed-culture",
            lab_positive("stool_culture").with_test("details", contains_ci("vibrio")),
            |ctx: &mut ActionContext| {
                ctx.diagnose(Diagnosis::new(
                    "cholera",
                    Confidence::Confirmed,
                    "Laboratory confirmed: V. cholerae isolated on stool culture",
                ));
            },
        )
        .with_salience(100),
        Rule::new(
            "cholera-rdt",
            Condition::all(vec![
                lab_positive("rdt_cholera").into(),
                Condition::not(
                    FactPattern::of(FactKind::Diagnosis)
                        .with_eq("disease", "cholera")
                        .with_eq("confidence", "confirmed"),
                ),
            ]),
            |ctx: &mut ActionContext| {
                ctx.diagnose(Diagnosis::new(
                    "cholera",
                    Confidence::Confident,
                    "Positive cholera RDT",
                ));
            },
        )
        .with_salience(95),
    ]
}
