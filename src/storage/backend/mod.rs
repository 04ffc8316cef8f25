//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod connection;
mod converters;
pub mod retry;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, SqlErr};
use tracing::{debug, error, info};

use crate::config::DatabaseConfig;
use crate::errors::{Result, ShortcodeError};
use crate::storage::{Mapping, Store};
use migration::entities::url_mapping;

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{mapping_to_active_model, model_to_mapping};

/// 判断是否为唯一约束冲突
pub fn is_unique_violation(err: &DbErr) -> bool {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }
    // 回退到错误消息匹配（主键冲突在部分驱动下不会被归类）
    let msg = err.to_string().to_lowercase();
    msg.contains("unique constraint failed")
        || msg.contains("duplicate key value")
        || msg.contains("duplicate entry")
}

/// SeaORM-based store
#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStore {
    pub async fn new(database_url: &str, backend_name: &str, config: &DatabaseConfig) -> Result<Self> {
        if database_url.is_empty() {
            return Err(ShortcodeError::config("database_url is not set"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name, config.pool_size).await?
        };

        let store = SeaOrmStore {
            db,
            backend_name: backend_name.to_string(),
            retry_config: retry::RetryConfig::from(config),
        };

        run_migrations(&store.db).await?;

        info!("{} store initialized", store.backend_name.to_uppercase());
        Ok(store)
    }

    /// 获取数据库连接（数据库序列共用同一连接池）
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl Store for SeaOrmStore {
    async fn get(&self, code: &str) -> Result<Option<Mapping>> {
        let db = &self.db;
        let code_owned = code.to_string();

        let result = retry::with_retry(&format!("get({})", code), self.retry_config, || async {
            url_mapping::Entity::find_by_id(&code_owned).one(db).await
        })
        .await;

        match result {
            Ok(model) => Ok(model.map(model_to_mapping)),
            Err(e) => {
                error!("Lookup of '{}' failed after retries: {}", code, e);
                Err(ShortcodeError::store_unavailable(format!(
                    "Failed to look up '{}': {}",
                    code, e
                )))
            }
        }
    }

    async fn insert_if_absent(&self, mapping: &Mapping) -> Result<()> {
        let active_model = mapping_to_active_model(mapping);

        match url_mapping::Entity::insert(active_model)
            .exec_without_returning(&self.db)
            .await
        {
            Ok(_) => {
                debug!("Inserted mapping '{}'", mapping.code);
                Ok(())
            }
            Err(e) if is_unique_violation(&e) => Err(ShortcodeError::store_conflict(format!(
                "Code '{}' already exists: {}",
                mapping.code, e
            ))),
            Err(e) => {
                error!("Insert of '{}' failed: {}", mapping.code, e);
                Err(ShortcodeError::store_unavailable(format!(
                    "Failed to insert '{}': {}",
                    mapping.code, e
                )))
            }
        }
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }
}
