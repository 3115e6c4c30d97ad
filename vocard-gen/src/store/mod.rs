//! Asset stores
//!
//! [`SqliteAssetStore`] persists the cache index across runs;
//! [`MemoryAssetStore`] lives for one process (tests, dry runs).

mod sqlite;

pub use sqlite::SqliteAssetStore;

use crate::types::{AssetRef, AssetStore, CacheKey, StoreError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-process asset index
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    entries: RwLock<HashMap<CacheKey, AssetRef>>,
    lookups: AtomicUsize,
    puts: AtomicUsize,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `lookup` calls served so far
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Number of `put` calls served so far
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl AssetStore for MemoryAssetStore {
    async fn lookup(&self, key: &CacheKey) -> Result<Option<AssetRef>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &CacheKey, asset: &AssetRef) -> Result<(), StoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.entries
            .write()
            .await
            .insert(key.clone(), asset.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AssetKind;

    #[tokio::test]
    async fn test_memory_store_put_then_lookup() {
        let store = MemoryAssetStore::new();
        let key = CacheKey::for_content(AssetKind::Image, "house");

        assert_eq!(store.lookup(&key).await.unwrap(), None);
        store.put(&key, &AssetRef::new("image_1.jpg")).await.unwrap();

        assert_eq!(
            store.lookup(&key).await.unwrap(),
            Some(AssetRef::new("image_1.jpg"))
        );
        assert_eq!(store.lookup_count(), 2);
        assert_eq!(store.put_count(), 1);
        assert_eq!(store.len().await, 1);
    }
}
