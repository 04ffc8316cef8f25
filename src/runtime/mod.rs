//! Application wiring
//!
//! Builds the store, sequence, cache and services from configuration and
//! hands them to each other explicitly.

pub mod engine;

pub use engine::Engine;
