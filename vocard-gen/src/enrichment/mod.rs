//! Media Enrichment
//!
//! Resolves the audio and image assets of an entity through the content-hash
//! cache, calling a generator only on a miss. See [`MediaEnricher`].

mod engine;
mod key_locks;

pub use engine::MediaEnricher;
pub use key_locks::KeyLocks;

use crate::types::{AssetKind, AssetRef, CacheKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Assets resolved for one entity, keyed by kind
///
/// A kind is absent when it was suppressed or soft-failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrichedDataBag(BTreeMap<AssetKind, AssetRef>);

impl EnrichedDataBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: AssetKind, asset: AssetRef) {
        self.0.insert(kind, asset);
    }

    pub fn get(&self, kind: AssetKind) -> Option<&AssetRef> {
        self.0.get(&kind)
    }

    pub fn contains(&self, kind: AssetKind) -> bool {
        self.0.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetKind, &AssetRef)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }
}

/// How one asset kind was resolved for one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    /// Store already had the key
    Reused { key: CacheKey, asset: AssetRef },
    /// Generator called and result stored
    Generated { key: CacheKey, asset: AssetRef },
    /// Entity asked for no asset of this kind
    Suppressed,
    /// Soft failure, logged and left out of the bag
    Failed { provider: &'static str, message: String },
}

impl AssetOutcome {
    pub fn asset(&self) -> Option<&AssetRef> {
        match self {
            Self::Reused { asset, .. } | Self::Generated { asset, .. } => Some(asset),
            Self::Suppressed | Self::Failed { .. } => None,
        }
    }
}

/// Bag plus per-kind outcomes, for callers reporting progress
#[derive(Debug, Clone, Default)]
pub struct EnrichmentReport {
    pub bag: EnrichedDataBag,
    pub outcomes: Vec<(AssetKind, AssetOutcome)>,
}

impl EnrichmentReport {
    fn record(&mut self, kind: AssetKind, outcome: AssetOutcome) {
        if let Some(asset) = outcome.asset() {
            self.bag.insert(kind, asset.clone());
        }
        self.outcomes.push((kind, outcome));
    }
}

/// Running totals across all entities enriched by one engine
#[derive(Debug, Default)]
pub(crate) struct EnrichmentCounters {
    reused: AtomicUsize,
    generated: AtomicUsize,
    suppressed: AtomicUsize,
    soft_failures: AtomicUsize,
}

impl EnrichmentCounters {
    pub(crate) fn count(&self, outcome: &AssetOutcome) {
        let counter = match outcome {
            AssetOutcome::Reused { .. } => &self.reused,
            AssetOutcome::Generated { .. } => &self.generated,
            AssetOutcome::Suppressed => &self.suppressed,
            AssetOutcome::Failed { .. } => &self.soft_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> EnrichmentStats {
        EnrichmentStats {
            reused: self.reused.load(Ordering::Relaxed),
            generated: self.generated.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
            soft_failures: self.soft_failures.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of [`MediaEnricher`] totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentStats {
    pub reused: usize,
    pub generated: usize,
    pub suppressed: usize,
    pub soft_failures: usize,
}
