//! Regime-aware coherence scoring and portfolio classification.
//!
//! The crate is split between a pure computation core (`advisor::holdings`,
//! `advisor::planning`) and the seams that connect it to the outside world:
//! the weekly regime source, the per-user portfolio store, and the
//! subscription directory. Presentation layers consume the structured enum
//! results and render them however they like.

pub mod advisor;
pub mod config;
pub mod error;
pub mod telemetry;
