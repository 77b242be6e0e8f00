//! Diagnostic error types for the daktari engine.
//!
//! Setup faults (a rule referencing a field its fact kind does not have) and
//! run-time faults (a rule set that never converges) get separate enums, each
//! with miette `#[diagnostic]` codes and help text, wrapped by a transparent
//! top-level error.

use miette::Diagnostic;
use thiserror::Error;

use crate::fact::FactKind;

/// Top-level error type for the daktari engine.
#[derive(Debug, Error, Diagnostic)]
pub enum DaktariError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] EngineError),
}

// ---------------------------------------------------------------------------
// Rule-set construction errors
// ---------------------------------------------------------------------------

/// Configuration faults detected while building a rule table. Fatal at setup.
#[derive(Debug, Error, Diagnostic)]
pub enum RuleError {
    #[error("rule '{rule}' references unknown field '{field}' on fact kind {kind}")]
    #[diagnostic(
        code(daktari::rule::unknown_field),
        help("Check the field name against the kind's schema (FactKind::schema). Field names are snake_case.")
    )]
    UnknownField {
        rule: String,
        kind: FactKind,
        field: String,
    },

    #[error("duplicate rule name: '{name}'")]
    #[diagnostic(
        code(daktari::rule::duplicate_name),
        help("Rule names identify firings in logs and the firing history. Give each rule a unique name.")
    )]
    DuplicateName { name: String },
}

// ---------------------------------------------------------------------------
// Run-time errors
// ---------------------------------------------------------------------------

/// Faults raised while driving the inference loop.
#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("ruleset did not converge within {max_firings} rule firings")]
    #[diagnostic(
        code(daktari::engine::no_convergence),
        help(
            "A rule whose action re-satisfies its own guard under a fresh binding will \
             chain forever. Review `not` guards and the facts your actions assert, or \
             raise EngineConfig::max_firings if the ruleset legitimately needs more. \
             Output emitted before this error must not be trusted."
        )
    )]
    NoConvergence { max_firings: usize },
}

/// Convenience alias for functions returning daktari results.
pub type DaktariResult<T> = std::result::Result<T, DaktariError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_error_converts_to_daktari_error() {
        let err = RuleError::UnknownField {
            rule: "x".into(),
            kind: FactKind::Symptom,
            field: "colour".into(),
        };
        let top: DaktariError = err.into();
        assert!(matches!(top, DaktariError::Rule(RuleError::UnknownField { .. })));
    }

    #[test]
    fn no_convergence_message_names_the_failure() {
        let err = EngineError::NoConvergence { max_firings: 64 };
        let msg = format!("{err}");
        assert!(msg.contains("did not converge"));
        assert!(msg.contains("64"));
    }
}
