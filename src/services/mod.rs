//! Allocation and resolution services

pub mod allocator;
pub mod resolver;

pub use allocator::{Allocator, AllocatorOptions};
pub use resolver::{Resolution, Resolver};
