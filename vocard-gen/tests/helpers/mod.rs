//! Test Helper Utilities
//!
//! Counting and failing capability fakes plus row builders shared by the
//! integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vocard_common::config::EnrichmentSettings;
use vocard_gen::records::RawRow;
use vocard_gen::sources::{RowSourceError, SourceRow};
use vocard_gen::types::{
    AssetRef, AssetStore, AudioGenerator, CacheKey, GenerationError, ImageGenerator, StoreError,
    TextEnhancer,
};
use vocard_gen::{MediaEnricher, Pipeline, TemplateRegistry};

/// Audio generator recording every text it is asked for
///
/// Texts containing `fail_marker` fail with a command error.
#[derive(Default)]
pub struct CountingAudio {
    calls: AtomicUsize,
    texts: Mutex<Vec<String>>,
    delay: Option<Duration>,
    fail_marker: Option<String>,
}

impl CountingAudio {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Self::default()
        })
    }

    pub fn failing_on(marker: &str) -> Arc<Self> {
        Arc::new(Self {
            fail_marker: Some(marker.to_string()),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AudioGenerator for CountingAudio {
    fn name(&self) -> &'static str {
        "counting-audio"
    }

    async fn generate(&self, text: &str) -> Result<AssetRef, GenerationError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.lock().unwrap().push(text.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(marker) = &self.fail_marker {
            if text.contains(marker.as_str()) {
                return Err(GenerationError::Command(format!("cannot speak '{}'", text)));
            }
        }
        Ok(AssetRef::new(format!("audio_{}.wav", n)))
    }
}

/// Image generator recording every query; optionally always failing
#[derive(Default)]
pub struct CountingImage {
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
    fail: bool,
}

impl CountingImage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ImageGenerator for CountingImage {
    fn name(&self) -> &'static str {
        "counting-image"
    }

    async fn generate(&self, query: &str) -> Result<AssetRef, GenerationError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err(GenerationError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        Ok(AssetRef::new(format!("image_{}.jpg", n)))
    }
}

/// Enhancer prefixing queries, or failing
pub struct PrefixEnhancer {
    pub prefix: Option<&'static str>,
}

#[async_trait::async_trait]
impl TextEnhancer for PrefixEnhancer {
    fn name(&self) -> &'static str {
        "prefix-enhancer"
    }

    async fn refine_image_query(&self, query: &str) -> Result<String, GenerationError> {
        match self.prefix {
            Some(prefix) => Ok(format!("{} {}", prefix, query)),
            None => Err(GenerationError::Network("enhancer offline".to_string())),
        }
    }
}

/// Store whose every operation fails
pub struct BrokenStore;

#[async_trait::async_trait]
impl AssetStore for BrokenStore {
    async fn lookup(&self, _key: &CacheKey) -> Result<Option<AssetRef>, StoreError> {
        Err(StoreError::Internal("disk on fire".to_string()))
    }

    async fn put(&self, _key: &CacheKey, _asset: &AssetRef) -> Result<(), StoreError> {
        Err(StoreError::Internal("disk on fire".to_string()))
    }
}

pub fn enricher(
    audio: Arc<dyn AudioGenerator>,
    image: Arc<dyn ImageGenerator>,
    store: Arc<dyn AssetStore>,
) -> MediaEnricher {
    MediaEnricher::new(audio, image, store, EnrichmentSettings::default())
}

pub fn pipeline(
    audio: Arc<dyn AudioGenerator>,
    image: Arc<dyn ImageGenerator>,
    store: Arc<dyn AssetStore>,
) -> Pipeline {
    Pipeline::new(enricher(audio, image, store), TemplateRegistry::builtin())
}

pub fn row(category: &str, values: &[&str]) -> Result<SourceRow, RowSourceError> {
    Ok(SourceRow::new(
        category,
        RawRow::positional(values.iter().copied()),
    ))
}

/// `Haus / das / house / Das Haus ist groß.`
pub fn haus_row() -> Result<SourceRow, RowSourceError> {
    row("noun", &["Haus", "das", "house", "", "Das Haus ist groß."])
}

pub fn noun_row(noun: &str, article: &str, english: &str, example: &str) -> Result<SourceRow, RowSourceError> {
    row("noun", &[noun, article, english, "", example])
}
