//! Cross-module tests for the cascade pipeline.
//!
//! - **Determinism tests**: repeated searches agree on move, score and board
//! - **Integration tests**: detection, resolution and search end-to-end
//! - **Property tests**: invariants over randomly generated boards
//!
//! # Test Structure
//!
//! - `determinism.rs`: Tests that verify deterministic execution
//! - `integration.rs`: End-to-end scenarios on hand-written boards
//! - `properties.rs`: proptest strategies and invariants
//! - `helpers.rs`: Board builders and shared assertions

mod determinism;
mod helpers;
mod properties;

// Re-export for convenience
pub use helpers::*;
