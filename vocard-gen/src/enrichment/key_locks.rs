//! Striped per-key locks
//!
//! A fixed pool of async mutexes; a cache key always maps to the same stripe,
//! so two tasks resolving the same key serialize while unrelated keys mostly
//! proceed in parallel. Memory stays bounded regardless of how many keys a
//! run touches.

use crate::types::CacheKey;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Debug)]
pub struct KeyLocks {
    stripes: Vec<Mutex<()>>,
}

impl KeyLocks {
    /// Create a pool with `stripes` mutexes (at least one)
    pub fn new(stripes: usize) -> Self {
        let stripes = stripes.max(1);
        Self {
            stripes: (0..stripes).map(|_| Mutex::new(())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.stripes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stripes.is_empty()
    }

    /// Hold the stripe for `key` until the guard drops
    pub async fn lock(&self, key: &CacheKey) -> MutexGuard<'_, ()> {
        self.stripes[key.stripe(self.stripes.len())].lock().await
    }
}
