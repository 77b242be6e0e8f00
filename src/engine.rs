//! Engine driver: the run-to-fixpoint inference loop.
//!
//! One [`Engine`] serves one diagnostic request: construct it over a shared
//! rule table, assert the input facts, call [`Engine::run`], read the output,
//! drop it. Evaluation is strictly single-threaded and synchronous; nothing
//! here suspends or performs I/O. Parallelism lives at the service layer,
//! which builds a fresh engine per request around one `Arc<RuleSet>`.
//!
//! The loop pops the best activation off the agenda, records it in the
//! firing history, executes its action, and recomputes the agenda whenever
//! the action asserted new facts. It terminates when the agenda empties, or
//! aborts with [`EngineError::NoConvergence`] once the firing cap is hit —
//! the only defense against a rule set whose assertions keep re-satisfying
//! its own guards under fresh bindings.

use std::collections::HashSet;
use std::sync::Arc;

use crate::agenda::{ActivationKey, Agenda};
use crate::error::EngineError;
use crate::fact::{Diagnosis, Fact, FactKind, FieldValue, SeverityIndicator};
use crate::matcher::Bindings;
use crate::output::{
    DiagnosisRecord, OutputChannel, Recommendation, RecommendationKind,
};
use crate::rule::RuleSet;
use crate::store::{FactId, FactStore};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Multiplier for the derived firing cap: `factor × rules × initial facts`.
const FIRING_CAP_FACTOR: usize = 8;

/// Floor for the derived firing cap, so tiny rule sets still get headroom.
const FIRING_CAP_FLOOR: usize = 64;

/// Configuration for the inference engine.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Hard cap on rule firings per `run()`. `None` derives
    /// `max(64, 8 × rule-count × fact-count)` at run start.
    pub max_firings: Option<usize>,
}

// ---------------------------------------------------------------------------
// Run summary
// ---------------------------------------------------------------------------

/// Statistics from a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Rules fired before the agenda emptied.
    pub firings: usize,
    /// Working-memory size after the run.
    pub facts: usize,
    /// Entries in the output channel.
    pub emissions: usize,
}

// ---------------------------------------------------------------------------
// Action capability
// ---------------------------------------------------------------------------

/// Capability handed to a firing rule's action: the only path by which
/// actions reach working memory and the output channel.
///
/// `diagnose` and `escalate` pair a fact assertion with its output record,
/// so the one-to-one correspondence between asserted `Diagnosis` /
/// `SeverityIndicator` facts and emitted records holds by construction.
/// A duplicate assertion is absorbed by the store and emits nothing, which
/// is what makes re-derivation of the same conclusion idempotent.
pub struct ActionContext<'a> {
    bindings: &'a Bindings,
    store: &'a mut FactStore,
    output: &'a mut OutputChannel,
}

impl ActionContext<'_> {
    /// Value bound under `name` by the rule's guard, if any.
    pub fn binding(&self, name: &str) -> Option<&FieldValue> {
        self.bindings.get(name)
    }

    /// Assert a fact. Diagnosis and severity-indicator facts are routed
    /// through their paired emit paths.
    pub fn assert(&mut self, fact: impl Into<Fact>) -> FactId {
        match fact.into() {
            Fact::Diagnosis(d) => self.diagnose(d),
            Fact::SeverityIndicator(s) => {
                let message = match &s.action {
                    Some(action) => format!("urgent: {} ({action})", s.indicator),
                    None => format!("urgent: {}", s.indicator),
                };
                self.escalate(s, message)
            }
            other => self.store.assert(other).0,
        }
    }

    /// Assert a diagnosis fact and emit its record.
    pub fn diagnose(&mut self, diagnosis: Diagnosis) -> FactId {
        let record = DiagnosisRecord::from(&diagnosis);
        let (id, inserted) = self.store.assert(Fact::Diagnosis(diagnosis));
        if inserted {
            self.output.push_diagnosis(record);
        }
        id
    }

    /// Assert a severity-indicator fact and emit an urgent recommendation.
    pub fn escalate(
        &mut self,
        indicator: SeverityIndicator,
        message: impl Into<String>,
    ) -> FactId {
        let (id, inserted) = self.store.assert(Fact::SeverityIndicator(indicator));
        if inserted {
            self.output.push_recommendation(Recommendation {
                kind: RecommendationKind::Urgent,
                message: message.into(),
            });
        }
        id
    }

    /// Emit a differential-diagnosis note. No fact is asserted.
    pub fn differential(&mut self, message: impl Into<String>) {
        self.output.push_recommendation(Recommendation {
            kind: RecommendationKind::Differential,
            message: message.into(),
        });
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// A forward-chaining inference engine over one working memory.
pub struct Engine {
    rules: Arc<RuleSet>,
    config: EngineConfig,
    store: FactStore,
    agenda: Agenda,
    fired: HashSet<ActivationKey>,
    output: OutputChannel,
}

impl Engine {
    /// Construct a fresh engine over a shared rule table.
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self::with_config(rules, EngineConfig::default())
    }

    pub fn with_config(rules: Arc<RuleSet>, config: EngineConfig) -> Self {
        tracing::debug!(rules = rules.len(), "constructed engine");
        Self {
            rules,
            config,
            store: FactStore::new(),
            agenda: Agenda::new(),
            fired: HashSet::new(),
            output: OutputChannel::new(),
        }
    }

    /// Assert one input fact. Duplicate assertion is a no-op returning the
    /// existing id.
    pub fn assert(&mut self, fact: impl Into<Fact>) -> FactId {
        self.store.assert(fact.into()).0
    }

    /// Drive the rule set to fixpoint.
    ///
    /// On [`EngineError::NoConvergence`] the run aborted mid-stream and the
    /// output channel holds an arbitrary prefix of emissions; callers must
    /// discard it rather than surface a partial result.
    pub fn run(&mut self) -> Result<RunSummary, EngineError> {
        let cap = self.config.max_firings.unwrap_or_else(|| {
            (FIRING_CAP_FACTOR * self.rules.len() * self.store.len().max(1))
                .max(FIRING_CAP_FLOOR)
        });

        let mut firings = 0usize;
        self.agenda.refresh(&self.rules, &self.store, &self.fired);

        while let Some(activation) = self.agenda.pop() {
            // Stale entry: already fired since this agenda was computed.
            if self.fired.contains(&activation.key) {
                continue;
            }
            if firings >= cap {
                tracing::warn!(max_firings = cap, "aborting non-convergent run");
                return Err(EngineError::NoConvergence { max_firings: cap });
            }

            self.fired.insert(activation.key.clone());
            self.store.advance_epoch();

            let rule = self.rules.get(activation.key.rule);
            tracing::debug!(
                rule = %rule.name,
                salience = rule.salience,
                recency = activation.recency,
                "firing"
            );

            let facts_before = self.store.len();
            let mut ctx = ActionContext {
                bindings: &activation.bindings,
                store: &mut self.store,
                output: &mut self.output,
            };
            (rule.action.as_ref())(&mut ctx);
            firings += 1;

            // New facts may enable or disable activations; recompute.
            if self.store.len() != facts_before {
                self.agenda.refresh(&self.rules, &self.store, &self.fired);
            }
        }

        let summary = RunSummary {
            firings,
            facts: self.store.len(),
            emissions: self.output.len(),
        };
        tracing::info!(
            firings = summary.firings,
            facts = summary.facts,
            emissions = summary.emissions,
            "inference run reached fixpoint"
        );
        Ok(summary)
    }

    /// Emitted diagnoses, in firing order.
    pub fn diagnoses(&self) -> impl Iterator<Item = &DiagnosisRecord> {
        self.output.diagnoses()
    }

    /// Emitted recommendations, in firing order.
    pub fn recommendations(&self) -> impl Iterator<Item = &Recommendation> {
        self.output.recommendations()
    }

    /// The full emission log.
    pub fn output(&self) -> &OutputChannel {
        &self.output
    }

    /// Working-memory facts of one kind, in assertion order.
    pub fn facts_of(&self, kind: FactKind) -> impl Iterator<Item = &Fact> {
        self.store.facts_of(kind).map(|(_, f)| f)
    }

    pub fn fact_count(&self) -> usize {
        self.store.len()
    }
}
