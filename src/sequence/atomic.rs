use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use super::SequenceGenerator;
use crate::errors::{Result, ShortcodeError};

/// 进程内原子计数器
#[derive(Debug)]
pub struct AtomicSequence {
    next: AtomicU64,
}

impl AtomicSequence {
    pub fn new(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    /// 下一次将发放的值
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SequenceGenerator for AtomicSequence {
    async fn next_id(&self) -> Result<u64> {
        // 到达上限时报错，不回绕
        self.next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| v.checked_add(1))
            .map_err(|v| {
                ShortcodeError::allocation_exhausted(format!("Sequence exhausted at {}", v))
            })
    }
}
