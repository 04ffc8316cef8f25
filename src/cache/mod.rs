//! Read-path cache in front of the store

use std::sync::Arc;

use crate::config::{CacheConfig, CacheType};

pub mod moka;
pub mod null;
pub mod traits;

pub use self::moka::MokaMappingCache;
pub use null::NullMappingCache;
pub use traits::{CacheResult, MappingCache};

pub struct CacheFactory;

impl CacheFactory {
    pub fn create(config: &CacheConfig) -> Arc<dyn MappingCache> {
        match config.cache_type {
            CacheType::Memory => Arc::new(MokaMappingCache::new(config)),
            CacheType::Disabled => Arc::new(NullMappingCache),
        }
    }
}
