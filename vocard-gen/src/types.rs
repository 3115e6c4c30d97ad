//! Core Types and Capability Traits
//!
//! The enrichment engine talks to the outside world only through the traits
//! defined here:
//! - [`AudioGenerator`] - pronunciation text → audio asset
//! - [`ImageGenerator`] - search query → image asset
//! - [`TextEnhancer`] - optional refinement of image queries
//! - [`AssetStore`] - cache of previously generated assets, keyed by content hash
//!
//! Asset references are opaque: their meaning belongs to the store and the
//! exporter, never to the pipeline.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Common Types
// ============================================================================

/// Kind of media asset attached to a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Pronunciation audio
    Audio,
    /// Illustrative image
    Image,
}

impl AssetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque reference to a stored asset (file name, path or service handle)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(String);

impl AssetRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content-hash key identifying one asset in the store
///
/// SHA-256 over `"{kind}\0{content}"`, hex encoded. Equal content of the same
/// kind always maps to the same key, which is what makes the store a cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_content(kind: AssetKind, content: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(kind.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(content.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Wrap a key previously produced by [`CacheKey::for_content`]
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stripe index in `0..stripes` used for per-key locking
    pub fn stripe(&self, stripes: usize) -> usize {
        if stripes <= 1 {
            return 0;
        }
        let prefix = self.0.get(..16).unwrap_or(&self.0);
        let value = u64::from_str_radix(prefix, 16).unwrap_or_else(|_| {
            self.0
                .bytes()
                .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64))
        });
        (value % stripes as u64) as usize
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How an entity wants to be illustrated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageStrategy {
    /// Search for an image with this query
    Query(String),
    /// Never attach an image (abstract words, grammatical particles)
    Suppressed,
}

impl ImageStrategy {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Self::Suppressed)
    }

    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Query(query) => Some(query),
            Self::Suppressed => None,
        }
    }
}

// ============================================================================
// Capability Traits
// ============================================================================

/// Pronunciation audio provider
///
/// Implementations own retries and backoff; the engine sees one terminal
/// outcome per call.
#[async_trait::async_trait]
pub trait AudioGenerator: Send + Sync {
    /// Provider name for error context and logs
    fn name(&self) -> &'static str;

    async fn generate(&self, text: &str) -> Result<AssetRef, GenerationError>;
}

/// Illustrative image provider
#[async_trait::async_trait]
pub trait ImageGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(&self, query: &str) -> Result<AssetRef, GenerationError>;
}

/// Text refinement provider (e.g. an LLM rewriting image search queries)
#[async_trait::async_trait]
pub trait TextEnhancer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Rewrite an image search query into one more likely to find a good picture
    async fn refine_image_query(&self, query: &str) -> Result<String, GenerationError>;
}

/// Local index of previously generated assets
///
/// Must tolerate concurrent lookups and writes. At-most-one generation per key
/// is enforced by the engine's key locks, not by the store.
#[async_trait::async_trait]
pub trait AssetStore: Send + Sync {
    async fn lookup(&self, key: &CacheKey) -> Result<Option<AssetRef>, StoreError>;

    async fn put(&self, key: &CacheKey, asset: &AssetRef) -> Result<(), StoreError>;
}

/// Failure reported by a generation capability
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// External API returned an error response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The service answered but had nothing for this input
    #[error("No result for '{0}'")]
    NoResult(String),

    /// External command failed
    #[error("Command failed: {0}")]
    Command(String),

    /// Provider is not configured (missing API key, disabled)
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// I/O error (writing the produced asset)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Asset store failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_depends_on_kind_and_content() {
        let audio = CacheKey::for_content(AssetKind::Audio, "das Haus");
        let audio_again = CacheKey::for_content(AssetKind::Audio, "das Haus");
        let image = CacheKey::for_content(AssetKind::Image, "das Haus");
        let other = CacheKey::for_content(AssetKind::Audio, "der Tisch");

        assert_eq!(audio, audio_again);
        assert_ne!(audio, image);
        assert_ne!(audio, other);
        assert_eq!(audio.as_str().len(), 64);
    }

    #[test]
    fn test_stripe_in_range() {
        let key = CacheKey::for_content(AssetKind::Image, "house");
        for stripes in [1, 2, 7, 64] {
            assert!(key.stripe(stripes) < stripes);
        }
        assert_eq!(key.stripe(0), 0);
        assert_eq!(CacheKey::from_hex("not-hex").stripe(8), CacheKey::from_hex("not-hex").stripe(8));
    }

    #[test]
    fn test_image_strategy_accessors() {
        let query = ImageStrategy::Query("house".to_string());
        assert_eq!(query.query(), Some("house"));
        assert!(!query.is_suppressed());
        assert!(ImageStrategy::Suppressed.is_suppressed());
        assert_eq!(ImageStrategy::Suppressed.query(), None);
    }

    #[test]
    fn test_asset_kind_serde() {
        assert_eq!(serde_json::to_string(&AssetKind::Audio).unwrap(), "\"audio\"");
        let kind: AssetKind = serde_json::from_str("\"image\"").unwrap();
        assert_eq!(kind, AssetKind::Image);
    }
}
