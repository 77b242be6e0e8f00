//! Typhoid fever rules.
//!
//! Step-ladder fever with relative bradycardia and rose spots are the
//! specific pictures; prolonged fever with abdominal symptoms, or
//! fever/headache with food-and-water exposure, is suspicion. Blood culture
//! is the gold standard; Widal carries a known false-positive rate and never
//! rises above suspicion.

use crate::condition::{Condition, FactPattern};
use crate::engine::ActionContext;
use crate::fact::{Confidence, Diagnosis, FactKind, SeverityIndicator};
use crate::rule::Rule;

use super::{at_least, contains_any, contains_ci, diagnosed, lab_positive, patient_flag, sym};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "typhoid-stepladder-bradycardia",
            Condition::all(vec![
                sym("fever").with_eq("pattern", "stepladder").into(),
                sym("relative_bradycardia").into(),
                Condition::not(diagnosed("typhoid")),
            ]),
            |ctx: &mut ActionContext| {
                ctx.diagnose(Diagnosis::new(
                    "typhoid",
                    Confidence::Confident,
                    "Step-ladder fever with relative bradycardia is pathognomonic for typhoid",
                ));
            },
        )
        .with_salience(90),
        Rule::new(
            "typhoid-rose-spots",
            Condition::all(vec![
                sym("rose_spots").into(),
                sym("fever").into(),
                Condition::not(diagnosed("typhoid")),
            ]),
            |ctx: &mut ActionContext| {
                ctx.diagnose(Diagnosis::new(
                    "typhoid",
                    Confidence::Confident,
                    "Rose spots (pink macules on trunk) are highly specific for typhoid fever",
                ));
            },
        )
        .with_salience(90),
        Rule::new(
            "typhoid-suspect-prolonged",
            Condition::all(vec![
                sym("fever").with_test("duration_days", at_least(5)).into(),
                sym("abdominal_pain").into(),
                Condition::any(vec![sym("constipation").into(), sym("diarrhea").into()]),
                Condition::not(diagnosed("typhoid")),
            ]),
            |ctx: &mut ActionContext| {
                ctx.diagnose(
                    Diagnosis::new(
                        "typhoid",
                        Confidence::Suspect,
                        "Prolonged fever (>=5 days) with abdominal pain",
                    )
                    .with_recommendation(
                        "Confirm with blood culture (gold standard) or Typhidot RDT",
                    ),
                );
            },
        )
        .with_salience(70),
        Rule::new(
            "typhoid-suspect-exposure",
            Condition::all(vec![
                sym("fever").into(),
                sym("headache").into(),
                Condition::any(vec![
                    patient_flag("unsafe_water").into(),
                    patient_flag("street_food").into(),
                ]),
                Condition::not(diagnosed("typhoid")),
                Condition::not(diagnosed("malaria")),
            ]),
            |ctx: &mut ActionContext| {
                ctx.diagnose(
                    Diagnosis::new(
                        "typhoid",
                        Confidence::Suspect,
                        "Fever with headache and history of unsafe water/street food consumption",
                    )
                    .with_recommendation("Consider blood culture or Widal test"),
                );
            },
        )
        .with_salience(50),
        Rule::new(
            "typhoid-confirmed-culture",
            lab_positive("blood_culture").with_test("details", contains_ci("salmonella")),
            |ctx: &mut ActionContext| {
                ctx.diagnose(Diagnosis::new(
                    "typhoid",
                    Confidence::Confirmed,
                    "Laboratory confirmed: S. typhi isolated on blood culture",
                ));
            },
        )
        .with_salience(100),
        Rule::new(
            "typhoid-typhidot",
            Condition::all(vec![
                lab_positive("typhidot").into(),
                sym("fever").into(),
                Condition::not(
                    FactPattern::of(FactKind::Diagnosis)
                        .with_eq("disease", "typhoid")
                        .with_eq("confidence", "confirmed"),
                ),
                Condition::not(
                    FactPattern::of(FactKind::Diagnosis)
                        .with_eq("disease", "typhoid")
                        .with_eq("confidence", "confident"),
                ),
            ]),
            |ctx: &mut ActionContext| {
                ctx.diagnose(Diagnosis::new(
                    "typhoid",
                    Confidence::Confident,
                    "Positive Typhidot RDT (95-97% sensitivity)",
                ));
            },
        )
        .with_salience(85),
        Rule::new(
            "typhoid-widal",
            Condition::all(vec![
                lab_positive("widal")
                    .with_test("details", contains_any(&["1:200", "1:320", "1:400"]))
                    .into(),
                sym("fever").into(),
                Condition::not(
                    FactPattern::of(FactKind::Diagnosis)
                        .with_eq("disease", "typhoid")
                        .with_eq("confidence", "confirmed"),
                ),
            ]),
            |ctx: &mut ActionContext| {
                ctx.diagnose(
                    Diagnosis::new(
                        "typhoid",
                        Confidence::Suspect,
                        "Widal positive (note: 14% false positive rate, may cross-react with malaria)",
                    )
                    .with_recommendation(
                        "Consider blood culture for confirmation (14% false positive rate with Widal)",
                    ),
                );
            },
        )
        .with_salience(75),
        Rule::new(
            "typhoid-complication-hemorrhage",
            Condition::all(vec![
                diagnosed("typhoid").into(),
                Condition::any(vec![
                    sym("melena").into(),
                    sym("bloody_stool").into(),
                    sym("severe_abdominal_pain").into(),
                ]),
            ]),
            |ctx: &mut ActionContext| {
                ctx.escalate(
                    SeverityIndicator::new("intestinal_complication")
                        .with_disease("typhoid")
                        .with_action("urgent_surgical_referral"),
                    "URGENT: Possible intestinal hemorrhage/perforation. Immediate surgical referral.",
                );
            },
        )
        .with_salience(100),
    ]
}
