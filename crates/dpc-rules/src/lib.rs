//! # dpc-rules — Compliance Rule Evaluation
//!
//! Point-in-time audits: a [`ComplianceProfile`] from the [`ProfileStore`]
//! is evaluated against a [`StateSnapshot`] through a [`RulePredicate`],
//! producing an [`AuditResult`].
//!
//! ## Architecture
//!
//! - **Profile** (`profile.rs`): rules, thresholds, status classification.
//! - **Store** (`store.rs`): explicitly constructed, read-mostly profile
//!   lookup, loadable from YAML or JSON files.
//! - **Snapshot** (`snapshot.rs`): the opaque key-value state under audit.
//! - **Predicate** (`predicate.rs`): the pluggable pass/fail decision.
//! - **Evaluation** (`evaluation.rs`): partitioning, percentage, status,
//!   severity-grouped recommendations.
//!
//! ## Crate Policy
//!
//! - Depends on `dpc-core` only, internally.
//! - Evaluation is pure over its inputs plus the predicate; audits of
//!   independent `(profile, snapshot)` pairs may run concurrently.

pub mod error;
pub mod evaluation;
pub mod predicate;
pub mod profile;
pub mod snapshot;
pub mod store;

// Re-export primary types.
pub use error::{LoadResult, ProfileLoadError};
pub use evaluation::{recommendations, AuditResult, RuleEvaluation, RuleEvaluator, RuleViolation};
pub use predicate::{
    ConstantPredicate, FnPredicate, RulePredicate, SimulatedPredicate, SnapshotFlagPredicate,
};
pub use profile::{ComplianceLevel, ComplianceLevels, ComplianceProfile, ComplianceRule};
pub use snapshot::StateSnapshot;
pub use store::ProfileStore;
