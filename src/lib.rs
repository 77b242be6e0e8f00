//! # daktari
//!
//! A forward-chaining rule engine for clinical triage. Typed facts live in a
//! content-addressed working memory; declarative guards (conjunction,
//! disjunction, negation-as-failure, wildcard and predicate tests, variable
//! binding) are matched against it; a salience/recency agenda picks the next
//! satisfied rule; firing actions assert derived facts and emit diagnoses
//! until the rule set reaches fixpoint.
//!
//! ## Architecture
//!
//! - **Facts** (`fact`): nine clinical record kinds with per-kind field schemas
//! - **Conditions** (`condition`): the guard tree, validated against schemas at setup
//! - **Fact Store** (`store`): deduplicating, epoch-stamped working memory
//! - **Matcher** (`matcher`): binding environments, joins, branch identity
//! - **Agenda** (`agenda`): salience → recency → declaration-order conflict resolution
//! - **Engine** (`engine`): the run-to-fixpoint loop with a firing cap
//! - **Output** (`output`): append-only emission log, one record per derived conclusion
//! - **Clinical rules** (`rules`): cholera/malaria/typhoid + WHO dehydration table
//!
//! ## Library usage
//!
//! ```
//! use std::sync::Arc;
//! use daktari::engine::Engine;
//! use daktari::fact::Symptom;
//! use daktari::rules;
//!
//! # fn main() -> Result<(), daktari::error::DaktariError> {
//! let table = Arc::new(rules::clinical_rules()?);
//! let mut engine = Engine::new(table);
//! engine.assert(Symptom::new("fever").with_present(true).with_pattern("cyclical"));
//! engine.assert(Symptom::new("chills").with_present(true));
//! engine.assert(Symptom::new("sweating").with_present(true));
//! engine.run()?;
//! for d in engine.diagnoses() {
//!     println!("{}: {}", d.disease, d.confidence);
//! }
//! # Ok(())
//! # }
//! ```

pub mod agenda;
pub mod condition;
pub mod engine;
pub mod error;
pub mod fact;
pub mod matcher;
pub mod output;
pub mod rule;
pub mod rules;
pub mod store;
