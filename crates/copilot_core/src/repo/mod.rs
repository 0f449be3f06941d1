//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the append-only analysis history contract.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - No repository API updates or deletes a persisted analysis.
//! - Read paths reject undecodable persisted state instead of masking it.

pub mod analysis_repo;
pub mod analysis_store;
