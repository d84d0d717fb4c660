//! Crate-level tests that exercise the whole stack.
//!
//! - `determinism.rs`: same seed and commands give the same battle
//! - `integration.rs`: end-to-end scenarios through [`Simulation`](crate::simulation::Simulation)
//! - `helpers.rs`: setup utilities shared with the per-module unit tests

mod determinism;
pub mod helpers;
