#![deny(missing_docs)]

//! # dpc-core — Foundational Types for the DP Compliance Engine
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies, only `serde`, `serde_json`,
//! `thiserror`, `chrono`, and `uuid` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Closed taxonomies.** [`EventType`], [`Severity`] and
//!    [`ComplianceStatus`] are enums with exhaustive `match` everywhere.
//!    Adding an event type is a compile error until every table that maps
//!    event types (classifier keywords, corrective actions, priorities,
//!    report heuristics) has been revisited.
//!
//! 2. **Newtype identifiers.** A [`SessionId`] cannot be passed where an
//!    [`ActionId`] is expected.
//!
//! 3. **[`DpcError`] hierarchy.** Structured errors with `thiserror`. The
//!    only failure that aborts an operation is an unknown profile name;
//!    everything else is recovered where it is seen.

pub mod error;
pub mod event;
pub mod identity;
pub mod severity;
pub mod vessel;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{DpcError, ProfileNotFoundError, ValidationError};
pub use event::{DpEvent, EventType};
pub use identity::{ActionId, SessionId};
pub use severity::{ComplianceStatus, Severity};
pub use vessel::{DpClass, VesselConfig};
