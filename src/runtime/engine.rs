use std::sync::Arc;

use tracing::info;

use crate::cache::{CacheFactory, MappingCache};
use crate::config::{SequenceKind, StaticConfig};
use crate::errors::Result;
use crate::sequence::{self, AtomicSequence, DatabaseSequence, SequenceGenerator};
use crate::services::{Allocator, AllocatorOptions, Resolution, Resolver};
use crate::storage::{Mapping, SeaOrmStore, Store, StoreFactory, infer_backend_from_url};

/// 分配器与解析器的组合入口
///
/// 两者共享同一个存储和缓存：分配成功的映射会立即写入缓存，
/// 并清除该短码可能存在的负缓存标记。
#[derive(Clone)]
pub struct Engine {
    allocator: Allocator,
    resolver: Resolver,
    store: Arc<dyn Store>,
}

impl Engine {
    pub fn new(
        store: Arc<dyn Store>,
        sequence: Arc<dyn SequenceGenerator>,
        cache: Arc<dyn MappingCache>,
        options: AllocatorOptions,
    ) -> Self {
        let allocator = Allocator::new(store.clone(), sequence, cache.clone(), options);
        let resolver = Resolver::new(store.clone(), cache);
        Self {
            allocator,
            resolver,
            store,
        }
    }

    /// 校验配置并构建所有组件
    pub async fn from_config(config: &StaticConfig) -> Result<Self> {
        config.validate()?;

        let options = AllocatorOptions::from(&config.allocator);
        let start = sequence::initial_value(&config.sequence, options.code_length)?;
        let cache = CacheFactory::create(&config.cache);

        let (store, sequence): (Arc<dyn Store>, Arc<dyn SequenceGenerator>) =
            match config.sequence.kind {
                SequenceKind::Atomic => (
                    StoreFactory::create(&config.database).await?,
                    Arc::new(AtomicSequence::new(start)),
                ),
                SequenceKind::Database => {
                    let backend = infer_backend_from_url(&config.database.database_url)?;
                    let store =
                        SeaOrmStore::new(&config.database.database_url, backend, &config.database)
                            .await?;
                    let sequence = DatabaseSequence::new(store.get_db().clone(), start);
                    (Arc::new(store), Arc::new(sequence))
                }
            };

        info!(
            "Engine ready: store={}, sequence={} (seed={}, start={}), cache={}, code_length={}, max_attempts={}, conflict_policy={}",
            store.backend_name(),
            config.sequence.kind,
            config.sequence.seed,
            start,
            config.cache.cache_type,
            options.code_length,
            options.max_attempts,
            options.conflict_policy
        );

        Ok(Self::new(store, sequence, cache, options))
    }

    pub async fn allocate(&self, target: &str) -> Result<Mapping> {
        self.allocator.allocate(target).await
    }

    pub async fn resolve(&self, code: &str) -> Result<Resolution> {
        self.resolver.resolve(code).await
    }

    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }
}
