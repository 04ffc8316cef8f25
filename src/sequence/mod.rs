//! CandidateId sources
//!
//! A sequence hands out each value at most once, no matter how many callers
//! race on it. The allocator only ever sees the trait.

use async_trait::async_trait;
use chrono::Utc;

use crate::config::{SeedStrategy, SequenceConfig};
use crate::errors::{Result, ShortcodeError};
use crate::utils::base62;

pub mod atomic;
pub mod database;

pub use atomic::AtomicSequence;
pub use database::DatabaseSequence;

#[async_trait]
pub trait SequenceGenerator: Send + Sync {
    /// 取出当前值并前进一步
    async fn next_id(&self) -> Result<u64>;
}

/// 根据种子策略计算序列起始值
pub fn initial_value(config: &SequenceConfig, code_length: usize) -> Result<u64> {
    match config.seed {
        SeedStrategy::Timestamp => Ok(Utc::now().timestamp_millis().max(0) as u64),
        SeedStrategy::Aligned => base62::min_value_with_len(code_length).ok_or_else(|| {
            ShortcodeError::config(format!(
                "No u64 value encodes to exactly {} characters",
                code_length
            ))
        }),
        SeedStrategy::Fixed => config
            .start
            .ok_or_else(|| ShortcodeError::config("sequence.start is required for seed = \"fixed\"")),
    }
}
