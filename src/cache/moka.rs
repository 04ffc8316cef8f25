use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::{debug, trace};

use super::{CacheResult, MappingCache};
use crate::config::CacheConfig;
use crate::storage::Mapping;

/// 基于 moka 的解析缓存
///
/// 映射不可变，正缓存只受容量和 TTL 约束；负缓存 TTL 较短，
/// 以限制其他进程新分配的短码被误判为不存在的时间。
pub struct MokaMappingCache {
    positive: Cache<String, Mapping>,
    negative: Option<Cache<String, ()>>,
}

impl MokaMappingCache {
    pub fn new(config: &CacheConfig) -> Self {
        let positive = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.default_ttl))
            .build();

        let negative = (config.negative_ttl > 0).then(|| {
            Cache::builder()
                .max_capacity(config.max_capacity)
                .time_to_live(Duration::from_secs(config.negative_ttl))
                .build()
        });

        debug!(
            "MokaMappingCache initialized: max_capacity={}, ttl={}s, negative_ttl={}s",
            config.max_capacity, config.default_ttl, config.negative_ttl
        );

        Self { positive, negative }
    }

    #[cfg(test)]
    async fn sync(&self) {
        self.positive.run_pending_tasks().await;
        if let Some(negative) = &self.negative {
            negative.run_pending_tasks().await;
        }
    }
}

#[async_trait]
impl MappingCache for MokaMappingCache {
    async fn get(&self, code: &str) -> CacheResult {
        if let Some(mapping) = self.positive.get(code).await {
            trace!("Cache hit for code: {}", code);
            return CacheResult::Found(mapping);
        }

        if let Some(negative) = &self.negative
            && negative.contains_key(code)
        {
            trace!("Negative cache hit for code: {}", code);
            return CacheResult::NotFound;
        }

        CacheResult::Miss
    }

    async fn insert(&self, mapping: &Mapping) {
        if let Some(negative) = &self.negative {
            negative.invalidate(mapping.code.as_str()).await;
        }
        self.positive
            .insert(mapping.code.clone(), mapping.clone())
            .await;
    }

    async fn mark_not_found(&self, code: &str) {
        if let Some(negative) = &self.negative {
            trace!("Marking code as not found: {}", code);
            negative.insert(code.to_string(), ()).await;
        }
    }
}
