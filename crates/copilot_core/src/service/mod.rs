//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate analyzer, parser and repository calls into one request.
//! - Own the explicit per-session dashboard state.
//!
//! # Invariants
//! - A failed request leaves the dashboard state unchanged.
//! - Services remain storage-agnostic behind `AnalysisRepository`.

pub mod analysis_service;
pub mod dashboard;
