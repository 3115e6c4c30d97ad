//! Pexels image search
//!
//! Searches for one photo per query and downloads its
//! medium rendition into the media folder. Requests are rate limited on the
//! client side to stay inside the free API quota.

use super::asset_file_name;
use crate::types::{AssetKind, AssetRef, GenerationError, ImageGenerator};
use serde::Deserialize;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

const PEXELS_SEARCH_URL: &str = "https://api.pexels.com/v1/search";

/// Requests per second allowed against the API
const REQUESTS_PER_SECOND: u32 = 3;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    id: u64,
    src: PhotoSources,
}

#[derive(Debug, Deserialize)]
struct PhotoSources {
    medium: String,
}

pub struct PexelsImageGenerator {
    api_key: String,
    media_dir: PathBuf,
    client: reqwest::Client,
    rate_limiter: governor::RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl PexelsImageGenerator {
    pub fn new(api_key: String, media_dir: PathBuf) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(vocard_common::config::get_user_agent())
            .build()
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let quota = governor::Quota::per_second(
            NonZeroU32::new(REQUESTS_PER_SECOND).unwrap_or(NonZeroU32::MIN),
        );

        Ok(Self {
            api_key,
            media_dir,
            client,
            rate_limiter: governor::RateLimiter::direct(quota),
        })
    }

    async fn search(&self, query: &str) -> Result<Option<Photo>, GenerationError> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(PEXELS_SEARCH_URL)
            .header("Authorization", &self.api_key)
            .query(&[("query", query), ("per_page", "1")])
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Network(format!("invalid search response: {}", e)))?;
        Ok(body.photos.into_iter().next())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, GenerationError> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: format!("image download failed: {}", url),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl ImageGenerator for PexelsImageGenerator {
    fn name(&self) -> &'static str {
        "pexels"
    }

    async fn generate(&self, query: &str) -> Result<AssetRef, GenerationError> {
        let photo = self
            .search(query)
            .await?
            .ok_or_else(|| GenerationError::NoResult(query.to_string()))?;

        debug!(query = query, photo_id = photo.id, "Downloading Pexels photo");
        let bytes = self.download(&photo.src.medium).await?;

        tokio::fs::create_dir_all(&self.media_dir).await?;
        let file_name = asset_file_name(AssetKind::Image, query, "jpg");
        tokio::fs::write(self.media_dir.join(&file_name), bytes).await?;

        Ok(AssetRef::new(file_name))
    }
}
