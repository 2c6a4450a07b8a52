use async_trait::async_trait;
use burrow_core::error::{Result, StorageError};
use burrow_core::repository::{ReadRepository, Repository};
use burrow_core::ShortCode;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// In-memory implementation of the Repository trait using DashMap.
///
/// DashMap provides better concurrency than RwLock<HashMap> because it
/// uses sharded locks, allowing concurrent reads and writes to different
/// buckets without blocking. Entry guards hold the shard lock, which makes
/// insert-if-absent and counter increments atomic per key.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    urls: DashMap<String, String>,
    hits: DashMap<String, u64>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<String> {
        self.urls
            .get(code.as_str())
            .map(|url| url.value().clone())
            .ok_or_else(|| StorageError::NotFound(code.to_string()))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.urls.contains_key(code.as_str()))
    }

    async fn hits(&self, code: &ShortCode) -> Result<u64> {
        Ok(self.hits.get(code.as_str()).map_or(0, |n| *n.value()))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn save(&self, code: &ShortCode, url: &str) -> Result<()> {
        self.urls.insert(code.as_str().to_owned(), url.to_owned());
        Ok(())
    }

    async fn insert(&self, code: &ShortCode, url: &str) -> Result<()> {
        match self.urls.entry(code.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(code.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(url.to_owned());
                Ok(())
            }
        }
    }

    async fn increment_hit(&self, code: &ShortCode) -> Result<u64> {
        let mut count = self.hits.entry(code.as_str().to_owned()).or_insert(0);
        *count = count.checked_add(1).ok_or_else(|| {
            StorageError::InvalidData(format!("hit counter for '{code}' overflowed"))
        })?;
        Ok(*count)
    }
}
