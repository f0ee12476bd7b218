//! # dpc-report — Compliance Reporting
//!
//! Pure functions from audits and monitoring sessions to report
//! structures, plus a separate plain-text renderer.
//!
//! ## Architecture
//!
//! - **Session** (`session.rs`): [`ReportData`] for one monitoring run.
//! - **Analysis** (`analysis.rs`): audit comparison and dead-banded trend.
//! - **Summary** (`summary.rs`): the combined executive digest.
//! - **Engine** (`engine.rs`): [`ReportEngine`], the tunable front door.
//! - **Render** (`render.rs`): text presentation. Report builders never
//!   format for display.

#![deny(missing_docs)]

pub mod analysis;
pub mod engine;
pub mod render;
pub mod session;
pub mod summary;

// Re-export primary types.
pub use analysis::{ComparisonEntry, ComparisonReport, TrendAnalysis, TrendDirection};
pub use engine::ReportEngine;
pub use session::ReportData;
pub use summary::ExecutiveSummary;
