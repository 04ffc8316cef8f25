//! In-process store backed by `DashMap`

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::trace;

use super::{Mapping, Store};
use crate::errors::{Result, ShortcodeError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: DashMap<String, Mapping>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, code: &str) -> Result<Option<Mapping>> {
        Ok(self.inner.get(code).map(|entry| entry.value().clone()))
    }

    async fn insert_if_absent(&self, mapping: &Mapping) -> Result<()> {
        // entry 持有分片写锁，检查与插入是原子的
        match self.inner.entry(mapping.code.clone()) {
            Entry::Occupied(_) => Err(ShortcodeError::store_conflict(format!(
                "Code '{}' already exists",
                mapping.code
            ))),
            Entry::Vacant(slot) => {
                slot.insert(mapping.clone());
                trace!("MemoryStore: inserted '{}'", mapping.code);
                Ok(())
            }
        }
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
