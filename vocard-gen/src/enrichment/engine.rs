//! Media enrichment engine
//!
//! Per asset kind: derive the cache key, look it up, generate on a miss and
//! store the result. A stripe lock is held around the whole
//! check-generate-store sequence, so concurrent entities sharing content
//! trigger at most one generation per key.

use super::{AssetOutcome, EnrichedDataBag, EnrichmentCounters, EnrichmentReport, EnrichmentStats, KeyLocks};
use crate::entities::{BoxedEntity, VocabularyEntity};
use crate::error::MediaGenerationError;
use crate::types::{
    AssetKind, AssetRef, AssetStore, AudioGenerator, CacheKey, GenerationError, ImageGenerator,
    ImageStrategy, StoreError, TextEnhancer,
};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use vocard_common::config::{EnrichmentSettings, FailurePolicy};

/// Resolves media assets for entities through the asset store
pub struct MediaEnricher {
    audio: Arc<dyn AudioGenerator>,
    image: Arc<dyn ImageGenerator>,
    enhancer: Option<Arc<dyn TextEnhancer>>,
    store: Arc<dyn AssetStore>,
    locks: KeyLocks,
    settings: EnrichmentSettings,
    counters: EnrichmentCounters,
}

impl MediaEnricher {
    pub fn new(
        audio: Arc<dyn AudioGenerator>,
        image: Arc<dyn ImageGenerator>,
        store: Arc<dyn AssetStore>,
        settings: EnrichmentSettings,
    ) -> Self {
        Self {
            audio,
            image,
            enhancer: None,
            store,
            locks: KeyLocks::new(settings.lock_stripes),
            settings,
            counters: EnrichmentCounters::default(),
        }
    }

    /// Refine image queries with `enhancer` before calling the image generator
    pub fn with_text_enhancer(mut self, enhancer: Arc<dyn TextEnhancer>) -> Self {
        self.enhancer = Some(enhancer);
        self
    }

    pub fn settings(&self) -> &EnrichmentSettings {
        &self.settings
    }

    pub fn stats(&self) -> EnrichmentStats {
        self.counters.snapshot()
    }

    fn policy(&self, kind: AssetKind) -> FailurePolicy {
        match kind {
            AssetKind::Audio => self.settings.audio_policy,
            AssetKind::Image => self.settings.image_policy,
        }
    }

    /// Resolve all assets of one entity
    pub async fn enrich(
        &self,
        entity: &dyn VocabularyEntity,
    ) -> Result<EnrichedDataBag, MediaGenerationError> {
        Ok(self.enrich_with_report(entity).await?.bag)
    }

    /// Like [`enrich`](Self::enrich), also reporting how each kind was resolved
    pub async fn enrich_with_report(
        &self,
        entity: &dyn VocabularyEntity,
    ) -> Result<EnrichmentReport, MediaGenerationError> {
        let mut report = EnrichmentReport::default();

        let text = entity.combined_pronunciation_text();
        let audio = self.resolve(AssetKind::Audio, &text).await?;
        self.counters.count(&audio);
        report.record(AssetKind::Audio, audio);

        let image = match entity.image_search_strategy() {
            ImageStrategy::Suppressed => {
                debug!(
                    headword = %entity.headword(),
                    category = %entity.category(),
                    "Image suppressed"
                );
                AssetOutcome::Suppressed
            }
            ImageStrategy::Query(query) => self.resolve(AssetKind::Image, &query).await?,
        };
        self.counters.count(&image);
        report.record(AssetKind::Image, image);

        Ok(report)
    }

    /// Enrich a batch with bounded concurrency
    ///
    /// One result per entity in input order. Entities not yet started when
    /// `cancel` fires yield [`MediaGenerationError::Cancelled`]; in-flight
    /// ones run to completion.
    pub async fn enrich_batch(
        &self,
        entities: &[BoxedEntity],
        cancel: &CancellationToken,
    ) -> Vec<Result<EnrichedDataBag, MediaGenerationError>> {
        let workers = self.settings.max_concurrent_entities.max(1);
        info!(
            entities = entities.len(),
            workers = workers,
            "Enriching batch"
        );

        stream::iter(entities.iter())
            .map(|entity| async move {
                if cancel.is_cancelled() {
                    return Err(MediaGenerationError::Cancelled);
                }
                self.enrich(entity.as_ref()).await
            })
            .buffered(workers)
            .collect()
            .await
    }

    async fn resolve(
        &self,
        kind: AssetKind,
        content: &str,
    ) -> Result<AssetOutcome, MediaGenerationError> {
        let key = CacheKey::for_content(kind, content);
        let _guard = self.locks.lock(&key).await;

        let cached = self
            .store
            .lookup(&key)
            .await
            .map_err(|cause| store_failure(kind, &key, cause))?;
        if let Some(asset) = cached {
            debug!(kind = %kind, key = %key, asset = %asset, "Cache hit");
            return Ok(AssetOutcome::Reused { key, asset });
        }

        match self.generate(kind, content).await {
            Ok(asset) => {
                self.store
                    .put(&key, &asset)
                    .await
                    .map_err(|cause| store_failure(kind, &key, cause))?;
                info!(kind = %kind, key = %key, asset = %asset, "Generated asset");
                Ok(AssetOutcome::Generated { key, asset })
            }
            Err((provider, cause)) => match self.policy(kind) {
                FailurePolicy::Hard => {
                    error!(kind = %kind, provider = provider, error = %cause, "Asset generation failed");
                    Err(MediaGenerationError::Generation {
                        kind,
                        provider,
                        cause,
                    })
                }
                FailurePolicy::Soft => {
                    warn!(
                        kind = %kind,
                        provider = provider,
                        error = %cause,
                        "Asset generation failed, continuing without it"
                    );
                    Ok(AssetOutcome::Failed {
                        provider,
                        message: cause.to_string(),
                    })
                }
            },
        }
    }

    /// Call the capability for `kind`, naming the provider on failure
    async fn generate(
        &self,
        kind: AssetKind,
        content: &str,
    ) -> Result<AssetRef, (&'static str, GenerationError)> {
        match kind {
            AssetKind::Audio => self
                .audio
                .generate(content)
                .await
                .map_err(|e| (self.audio.name(), e)),
            AssetKind::Image => {
                let query = match &self.enhancer {
                    Some(enhancer) => {
                        let refined = enhancer
                            .refine_image_query(content)
                            .await
                            .map_err(|e| (enhancer.name(), e))?;
                        let refined = refined.trim();
                        if refined.is_empty() {
                            return Err((
                                enhancer.name(),
                                GenerationError::NoResult(content.to_string()),
                            ));
                        }
                        debug!(original = content, refined = refined, "Refined image query");
                        refined.to_string()
                    }
                    None => content.to_string(),
                };
                self.image
                    .generate(&query)
                    .await
                    .map_err(|e| (self.image.name(), e))
            }
        }
    }
}

fn store_failure(kind: AssetKind, key: &CacheKey, cause: StoreError) -> MediaGenerationError {
    error!(kind = %kind, key = %key, error = %cause, "Asset store failed");
    MediaGenerationError::Store { kind, cause }
}
