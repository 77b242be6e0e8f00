//! Malaria rules.
//!
//! The classic paroxysm (cyclical fever, chills, sweating) carries the
//! diagnosis on its own; nonspecific fever in a traveler is suspicion only.
//! Cerebral-malaria and blackwater-fever danger signs escalate regardless of
//! whether a malaria diagnosis has been made yet — febrile patients with
//! those signs are referred first and confirmed later.

use crate::condition::{Condition, FactPattern};
use crate::engine::ActionContext;
use crate::fact::{Confidence, Diagnosis, FactKind, SeverityIndicator};
use crate::rule::Rule;

use super::{diagnosed, lab_positive, one_of, patient_flag, sym};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "malaria-paroxysm",
            Condition::all(vec![
                sym("fever").with_eq("pattern", "cyclical").into(),
                sym("chills").into(),
                sym("sweating").into(),
            ]),
            |ctx: &mut ActionContext| {
                ctx.diagnose(Diagnosis::new(
                    "malaria",
                    Confidence::Confident,
                    "Classic malarial paroxysm: cyclical fever with chills followed by sweating",
                ));
            },
        )
        .with_salience(90),
        Rule::new(
            "malaria-bitter-taste",
            Condition::all(vec![
                sym("fever").into(),
                sym("bitter_taste").into(),
                patient_flag("travel_endemic_area").into(),
                Condition::not(diagnosed("malaria")),
            ]),
            |ctx: &mut ActionContext| {
                ctx.diagnose(Diagnosis::new(
                    "malaria",
                    Confidence::Confident,
                    "Fever with bitter taste in mouth is highly suggestive of malaria",
                ));
            },
        )
        .with_salience(80),
        Rule::new(
            "malaria-suspect-endemic",
            Condition::all(vec![
                sym("fever").into(),
                Condition::any(vec![
                    sym("chills").into(),
                    sym("headache").into(),
                    sym("body_aches").into(),
                ]),
                patient_flag("travel_endemic_area").into(),
                Condition::not(diagnosed("malaria")),
            ]),
            |ctx: &mut ActionContext| {
                ctx.diagnose(
                    Diagnosis::new(
                        "malaria",
                        Confidence::Suspect,
                        "Fever with nonspecific symptoms in traveler from endemic area",
                    )
                    .with_recommendation("Confirm with blood smear or malaria RDT"),
                );
            },
        )
        .with_salience(65),
        Rule::new(
            "malaria-confirmed-smear",
            lab_positive("blood_smear"),
            |ctx: &mut ActionContext| {
                ctx.diagnose(Diagnosis::new(
                    "malaria",
                    Confidence::Confirmed,
                    "Laboratory confirmed: Plasmodium parasites on blood smear",
                ));
            },
        )
        .with_salience(100),
        Rule::new(
            "malaria-rdt",
            Condition::all(vec![
                lab_positive("rdt_malaria").into(),
                Condition::not(FactPattern::of(FactKind::LabResult).with_eq("test", "blood_smear")),
            ]),
            |ctx: &mut ActionContext| {
                ctx.diagnose(Diagnosis::new(
                    "malaria",
                    Confidence::Confident,
                    "Positive malaria RDT",
                ));
            },
        )
        .with_salience(95),
        Rule::new(
            "malaria-severe-cerebral",
            Condition::all(vec![
                Condition::any(vec![diagnosed("malaria").into(), sym("fever").into()]),
                Condition::any(vec![
                    sym("altered_consciousness").into(),
                    sym("convulsions").into(),
                    sym("prostration").into(),
                ]),
            ]),
            |ctx: &mut ActionContext| {
                ctx.escalate(
                    SeverityIndicator::new("cerebral_malaria")
                        .with_disease("malaria")
                        .with_action("urgent_referral_IV_artesunate"),
                    "URGENT: Possible cerebral malaria. Immediate referral for IV Artesunate.",
                );
            },
        )
        .with_salience(100),
        Rule::new(
            "malaria-severe-blackwater",
            Condition::all(vec![
                Condition::any(vec![diagnosed("malaria").into(), sym("fever").into()]),
                sym("dark_urine")
                    .with_test("description", one_of(&["black", "cola", "red"]))
                    .into(),
            ]),
            |ctx: &mut ActionContext| {
                ctx.escalate(
                    SeverityIndicator::new("blackwater_fever")
                        .with_disease("malaria")
                        .with_action("urgent_referral"),
                    "URGENT: Possible blackwater fever (hemoglobinuria). Immediate referral.",
                );
            },
        )
        .with_salience(95),
    ]
}
