//! Short code resolution (read path)

use std::sync::Arc;

use tracing::{trace, warn};

use crate::cache::{CacheResult, MappingCache};
use crate::errors::{Result, ShortcodeError};
use crate::storage::{Mapping, Store};
use crate::utils::url_validator::validate_stored_target;

/// 解析结果；未找到是正常结果，不是错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(Mapping),
    NotFound,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    pub fn mapping(&self) -> Option<&Mapping> {
        match self {
            Resolution::Found(mapping) => Some(mapping),
            Resolution::NotFound => None,
        }
    }

    pub fn into_mapping(self) -> Option<Mapping> {
        match self {
            Resolution::Found(mapping) => Some(mapping),
            Resolution::NotFound => None,
        }
    }
}

#[derive(Clone)]
pub struct Resolver {
    store: Arc<dyn Store>,
    cache: Arc<dyn MappingCache>,
}

impl Resolver {
    pub fn new(store: Arc<dyn Store>, cache: Arc<dyn MappingCache>) -> Self {
        Self { store, cache }
    }

    /// 按原样（区分大小写、不做规范化）解析短码
    ///
    /// # Errors
    /// - `CorruptTarget`: 存储中的目标地址不是合法的绝对 URI
    /// - `StoreUnavailable`: 存储故障
    pub async fn resolve(&self, code: &str) -> Result<Resolution> {
        match self.cache.get(code).await {
            CacheResult::Found(mapping) => return Ok(Resolution::Found(mapping)),
            CacheResult::NotFound => return Ok(Resolution::NotFound),
            CacheResult::Miss => {}
        }

        let stored = self.store.get(code).await.map_err(|e| match e {
            ShortcodeError::StoreUnavailable(_) => e,
            other => ShortcodeError::store_unavailable(other.to_string()),
        })?;

        match stored {
            Some(mapping) => {
                if let Err(e) = validate_stored_target(&mapping.target) {
                    warn!(
                        "Resolver: stored target for '{}' is unusable: {}",
                        code, e
                    );
                    return Err(ShortcodeError::corrupt_target(format!(
                        "Target of '{}' is not a valid URI: {}",
                        code, e
                    )));
                }
                self.cache.insert(&mapping).await;
                Ok(Resolution::Found(mapping))
            }
            None => {
                trace!("Resolver: '{}' not found", code);
                self.cache.mark_not_found(code).await;
                Ok(Resolution::NotFound)
            }
        }
    }
}
