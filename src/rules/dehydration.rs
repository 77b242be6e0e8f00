//! WHO dehydration classification.
//!
//! Assessment signs (mental state, eyes, thirst, skin pinch) classify the
//! patient into severe / some / no dehydration, mapped to treatment plans
//! C / B / A. Severe dehydration is itself a danger sign and escalates.

use crate::condition::{Condition, FactPattern};
use crate::engine::ActionContext;
use crate::fact::{DehydrationLevel, FactKind, SeverityIndicator};
use crate::rule::Rule;

use super::{one_of, sign};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "dehydration-severe",
            Condition::all(vec![
                Condition::any(vec![
                    sign("mental_state", "lethargic").into(),
                    sign("mental_state", "unconscious").into(),
                ]),
                sign("eyes", "sunken").into(),
                FactPattern::of(FactKind::DehydrationSign)
                    .with_eq("sign", "skin_pinch")
                    .with_test("finding", one_of(&["very_slow", ">2_seconds"]))
                    .into(),
            ]),
            |ctx: &mut ActionContext| {
                ctx.assert(DehydrationLevel::new("severe").with_treatment_plan("C"));
                ctx.escalate(
                    SeverityIndicator::new("severe_dehydration")
                        .with_action("IV_rehydration_urgent"),
                    "URGENT: severe dehydration. Begin IV rehydration (WHO plan C) immediately.",
                );
            },
        ),
        Rule::new(
            "dehydration-some",
            Condition::all(vec![
                Condition::any(vec![
                    sign("mental_state", "restless").into(),
                    sign("mental_state", "irritable").into(),
                ]),
                sign("thirst", "drinks_eagerly").into(),
                sign("skin_pinch", "slow").into(),
                Condition::not(
                    FactPattern::of(FactKind::DehydrationLevel).with_eq("level", "severe"),
                ),
            ]),
            |ctx: &mut ActionContext| {
                ctx.assert(DehydrationLevel::new("some").with_treatment_plan("B"));
            },
        ),
        Rule::new(
            "dehydration-none",
            Condition::all(vec![
                sign("mental_state", "alert").into(),
                sign("thirst", "drinks_normally").into(),
                sign("skin_pinch", "normal").into(),
                Condition::not(
                    FactPattern::of(FactKind::DehydrationLevel).with_wildcard("level"),
                ),
            ]),
            |ctx: &mut ActionContext| {
                ctx.assert(DehydrationLevel::new("none").with_treatment_plan("A"));
            },
        ),
    ]
}
