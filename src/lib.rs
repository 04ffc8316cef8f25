//! Shortcode - short-code allocation and resolution engine
//!
//! Maps long URLs to compact base62 codes and resolves them back. HTTP,
//! authentication and analytics live in the embedding application; this crate
//! owns code generation, the uniqueness-retry protocol and the read path.
//!
//! # Architecture
//! - `utils`: base62 encoder and URL validation
//! - `sequence`: CandidateId generators (atomic counter, database counter row)
//! - `storage`: `Store` trait with in-memory and SeaORM backends
//! - `cache`: read-path cache (moka)
//! - `services`: `Allocator` and `Resolver`
//! - `config`: static configuration loading and validation
//! - `runtime`: `Engine`, the composition root
//! - `system`: logging initialization

pub mod cache;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod sequence;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;

pub use errors::{Result, ShortcodeError};
pub use runtime::Engine;
pub use services::{Allocator, AllocatorOptions, Resolution, Resolver};
pub use storage::{Mapping, Store};
