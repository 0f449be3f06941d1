//! Domain model for analyses and their action items.
//!
//! # Responsibility
//! - Define canonical data structures shared by parser, store and dashboard.
//! - Keep the on-disk task shape (`{"task", "done"}`) in one place.
//!
//! # Invariants
//! - A persisted `AnalysisRecord` is immutable; history is append-only.

pub mod analysis;
