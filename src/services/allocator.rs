//! Short code allocation
//!
//! The allocator is the only writer of new mappings. Candidate codes come from
//! the injected sequence, pass through base62 and length normalization, are
//! pre-checked against the store, and are finally inserted with the store's
//! insert-if-absent primitive, which has the last word on uniqueness.

use std::sync::Arc;

use tracing::{debug, error, info, trace, warn};

use crate::cache::MappingCache;
use crate::config::{AllocatorConfig, ConflictPolicy};
use crate::errors::{Result, ShortcodeError};
use crate::sequence::SequenceGenerator;
use crate::storage::{Mapping, Store};
use crate::utils::base62;
use crate::utils::url_validator::validate_target;

/// 分配器参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatorOptions {
    /// 短码固定长度
    pub code_length: usize,
    /// 查重尝试上限
    pub max_attempts: u32,
    /// 插入时唯一约束冲突的处理方式
    pub conflict_policy: ConflictPolicy,
}

impl Default for AllocatorOptions {
    fn default() -> Self {
        Self::from(&AllocatorConfig::default())
    }
}

impl From<&AllocatorConfig> for AllocatorOptions {
    fn from(config: &AllocatorConfig) -> Self {
        Self {
            code_length: config.code_length,
            max_attempts: config.max_attempts,
            conflict_policy: config.conflict_policy,
        }
    }
}

#[derive(Clone)]
pub struct Allocator {
    store: Arc<dyn Store>,
    sequence: Arc<dyn SequenceGenerator>,
    cache: Arc<dyn MappingCache>,
    options: AllocatorOptions,
}

impl Allocator {
    pub fn new(
        store: Arc<dyn Store>,
        sequence: Arc<dyn SequenceGenerator>,
        cache: Arc<dyn MappingCache>,
        options: AllocatorOptions,
    ) -> Self {
        Self {
            store,
            sequence,
            cache,
            options,
        }
    }

    pub fn options(&self) -> &AllocatorOptions {
        &self.options
    }

    /// 为目标地址分配一个新短码并持久化
    ///
    /// 目标地址去除首尾空白后必须是 http(s) 绝对地址，否则在取号之前返回 `InvalidInput`。
    ///
    /// # Errors
    /// - `InvalidInput`: 目标地址为空或不合法
    /// - `AllocationExhausted`: 连续 `max_attempts` 个候选短码均已被占用，或序列耗尽
    /// - `StoreConflict`: 查重之后、插入之前被其他分配者抢占（`conflict_policy = fail`）
    /// - `StoreUnavailable`: 存储故障
    pub async fn allocate(&self, target: &str) -> Result<Mapping> {
        let target =
            validate_target(target).map_err(|e| ShortcodeError::invalid_input(e.to_string()))?;

        for attempt in 1..=self.options.max_attempts {
            let code = self.next_candidate().await?;

            if self
                .store
                .get(&code)
                .await
                .map_err(into_store_unavailable)?
                .is_some()
            {
                debug!(
                    "Allocator: code '{}' already taken (attempt {}/{})",
                    code, attempt, self.options.max_attempts
                );
                continue;
            }

            let mapping = Mapping::new(code, target);
            match self.store.insert_if_absent(&mapping).await {
                Ok(()) => {
                    self.cache.insert(&mapping).await;
                    info!(
                        "Allocator: created '{}' -> '{}' (attempt {})",
                        mapping.code, mapping.target, attempt
                    );
                    return Ok(mapping);
                }
                Err(ShortcodeError::StoreConflict(msg))
                    if self.options.conflict_policy == ConflictPolicy::Retry =>
                {
                    warn!(
                        "Allocator: lost insert race for '{}' (attempt {}/{}), retrying: {}",
                        mapping.code, attempt, self.options.max_attempts, msg
                    );
                }
                Err(ShortcodeError::StoreConflict(msg)) => {
                    warn!("Allocator: lost insert race for '{}': {}", mapping.code, msg);
                    return Err(ShortcodeError::StoreConflict(msg));
                }
                Err(e) => return Err(into_store_unavailable(e)),
            }
        }

        error!(
            "Allocator: no unused code found after {} attempts",
            self.options.max_attempts
        );
        Err(ShortcodeError::allocation_exhausted(format!(
            "Could not find an unused code after {} attempts",
            self.options.max_attempts
        )))
    }

    /// 取下一个候选短码
    ///
    /// 编码不足 `code_length` 时丢弃并重新取号（从不补零），
    /// 超出时截取前 `code_length` 位。截断有损，不同的序列值可能得到相同短码。
    async fn next_candidate(&self) -> Result<String> {
        loop {
            let id = self.sequence.next_id().await?;
            let mut code = base62::encode(id);

            if code.len() < self.options.code_length {
                trace!("Allocator: candidate {} encodes too short ('{}')", id, code);
                continue;
            }

            // base62 字母表全为 ASCII，按字节截断安全
            code.truncate(self.options.code_length);
            return Ok(code);
        }
    }
}

/// 存储返回的非冲突错误统一视为存储不可用
fn into_store_unavailable(err: ShortcodeError) -> ShortcodeError {
    match err {
        ShortcodeError::StoreUnavailable(_) => err,
        other => ShortcodeError::store_unavailable(other.to_string()),
    }
}
