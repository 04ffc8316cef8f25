//! Persistence collaborators
//!
//! The engine only needs point lookup and insert-if-absent from a store; the
//! store's own uniqueness enforcement is the final word on whether a code is
//! taken.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::DatabaseConfig;
use crate::errors::{Result, ShortcodeError};

pub mod backend;
pub mod memory;
pub mod models;

pub use backend::SeaOrmStore;
pub use memory::MemoryStore;
pub use models::Mapping;

#[async_trait]
pub trait Store: Send + Sync {
    /// 按短码精确查询（区分大小写）
    ///
    /// 不存在时返回 `Ok(None)`；存储故障返回 `StoreUnavailable`。
    async fn get(&self, code: &str) -> Result<Option<Mapping>>;

    /// 仅当短码不存在时插入
    ///
    /// 短码已存在返回 `StoreConflict`，其他故障返回 `StoreUnavailable`。
    async fn insert_if_absent(&self, mapping: &Mapping) -> Result<()>;

    /// 后端名称，用于日志
    fn backend_name(&self) -> &str;
}

/// 从数据库 URL 推断存储类型
pub fn infer_backend_from_url(database_url: &str) -> Result<&'static str> {
    if database_url == "memory" || database_url.starts_with("memory://") {
        Ok("memory")
    } else if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite")
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql")
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres")
    } else {
        Err(ShortcodeError::config(format!(
            "Cannot infer store type from URL '{}'. Supported: memory://, sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

pub struct StoreFactory;

impl StoreFactory {
    /// 根据配置创建存储
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<dyn Store>> {
        let backend_name = infer_backend_from_url(&config.database_url)?;

        if backend_name == "memory" {
            return Ok(Arc::new(MemoryStore::new()));
        }

        let store = SeaOrmStore::new(&config.database_url, backend_name, config).await?;
        Ok(Arc::new(store))
    }
}
