//! Test doubles shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use shortcode::errors::{Result, ShortcodeError};
use shortcode::sequence::SequenceGenerator;
use shortcode::storage::{Mapping, MemoryStore, Store};

/// 按脚本依次发放的序列
pub struct ScriptedSequence {
    values: Mutex<VecDeque<u64>>,
    calls: AtomicUsize,
}

impl ScriptedSequence {
    pub fn new(values: impl IntoIterator<Item = u64>) -> Self {
        Self {
            values: Mutex::new(values.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SequenceGenerator for ScriptedSequence {
    async fn next_id(&self) -> Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.values
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ShortcodeError::allocation_exhausted("script ran out"))
    }
}

/// 查重永远返回不存在，前 `conflicts` 次插入报冲突，模拟竞争窗口
pub struct RacyStore {
    inner: MemoryStore,
    conflicts: AtomicUsize,
}

impl RacyStore {
    pub fn new(conflicts: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            conflicts: AtomicUsize::new(conflicts),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait]
impl Store for RacyStore {
    async fn get(&self, _code: &str) -> Result<Option<Mapping>> {
        Ok(None)
    }

    async fn insert_if_absent(&self, mapping: &Mapping) -> Result<()> {
        let remaining = self.conflicts.load(Ordering::SeqCst);
        if remaining > 0 {
            self.conflicts.store(remaining - 1, Ordering::SeqCst);
            return Err(ShortcodeError::store_conflict(format!(
                "'{}' inserted concurrently",
                mapping.code
            )));
        }
        self.inner.insert_if_absent(mapping).await
    }

    fn backend_name(&self) -> &str {
        "racy"
    }
}

/// 可以分别让读写失败的存储
pub struct FailingStore {
    pub fail_get: bool,
    pub fail_insert: bool,
    inner: MemoryStore,
}

impl FailingStore {
    pub fn new(fail_get: bool, fail_insert: bool) -> Self {
        Self {
            fail_get,
            fail_insert,
            inner: MemoryStore::new(),
        }
    }
}

#[async_trait]
impl Store for FailingStore {
    async fn get(&self, code: &str) -> Result<Option<Mapping>> {
        if self.fail_get {
            return Err(ShortcodeError::store_unavailable("connection refused"));
        }
        self.inner.get(code).await
    }

    async fn insert_if_absent(&self, mapping: &Mapping) -> Result<()> {
        if self.fail_insert {
            return Err(ShortcodeError::store_unavailable("disk full"));
        }
        self.inner.insert_if_absent(mapping).await
    }

    fn backend_name(&self) -> &str {
        "failing"
    }
}

/// 统计读取次数的存储
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    gets: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Store for CountingStore {
    async fn get(&self, code: &str) -> Result<Option<Mapping>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(code).await
    }

    async fn insert_if_absent(&self, mapping: &Mapping) -> Result<()> {
        self.inner.insert_if_absent(mapping).await
    }

    fn backend_name(&self) -> &str {
        "counting"
    }
}
