use async_trait::async_trait;

use super::{CacheResult, MappingCache};
use crate::storage::Mapping;

/// 不缓存任何内容，所有查询直达存储
#[derive(Debug, Default)]
pub struct NullMappingCache;

#[async_trait]
impl MappingCache for NullMappingCache {
    async fn get(&self, _code: &str) -> CacheResult {
        CacheResult::Miss
    }

    async fn insert(&self, _mapping: &Mapping) {}

    async fn mark_not_found(&self, _code: &str) {}
}
