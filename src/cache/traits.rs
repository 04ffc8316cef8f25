use async_trait::async_trait;

use crate::storage::Mapping;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult {
    /// 成功获取到缓存值
    Found(Mapping),
    /// 近期确认过不存在（负缓存命中）
    NotFound,
    /// 缓存中没有任何信息，需要查询存储
    Miss,
}

#[async_trait]
pub trait MappingCache: Send + Sync {
    async fn get(&self, code: &str) -> CacheResult;

    /// 写入映射，同时清除该短码的负缓存标记
    async fn insert(&self, mapping: &Mapping);

    /// 记录短码不存在
    async fn mark_not_found(&self, code: &str);
}
