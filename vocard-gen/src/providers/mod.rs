//! Media providers
//!
//! Concrete implementations of the generation capabilities:
//! - [`CommandAudioGenerator`] - local text-to-speech command
//! - [`PexelsImageGenerator`] - Pexels photo search
//! - [`UnconfiguredImageGenerator`] - stand-in when no image service is set up

mod command_tts;
mod pexels;

pub use command_tts::CommandAudioGenerator;
pub use pexels::PexelsImageGenerator;

use crate::types::{AssetKind, AssetRef, CacheKey, GenerationError, ImageGenerator};

/// File name for a generated asset: `{kind}_{hash prefix}.{extension}`
///
/// Deterministic in the content, so re-generating overwrites the same file.
pub(crate) fn asset_file_name(kind: AssetKind, content: &str, extension: &str) -> String {
    let key = CacheKey::for_content(kind, content);
    let hash = key.as_str().get(..16).unwrap_or(key.as_str());
    format!("{}_{}.{}", kind, hash, extension.trim_start_matches('.'))
}

/// Image generator that always reports it is not configured
///
/// With the default soft image policy every card is built without a picture.
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredImageGenerator {
    reason: String,
}

impl UnconfiguredImageGenerator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait::async_trait]
impl ImageGenerator for UnconfiguredImageGenerator {
    fn name(&self) -> &'static str {
        "unconfigured"
    }

    async fn generate(&self, _query: &str) -> Result<AssetRef, GenerationError> {
        Err(GenerationError::NotConfigured(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_file_name_is_deterministic() {
        let a = asset_file_name(AssetKind::Audio, "das Haus", "wav");
        let b = asset_file_name(AssetKind::Audio, "das Haus", ".wav");
        assert_eq!(a, b);
        assert!(a.starts_with("audio_"));
        assert!(a.ends_with(".wav"));
        assert_eq!(a.len(), "audio_".len() + 16 + ".wav".len());
        assert_ne!(a, asset_file_name(AssetKind::Audio, "der Tisch", "wav"));
    }

    #[tokio::test]
    async fn test_unconfigured_generator_fails() {
        let generator = UnconfiguredImageGenerator::new("no Pexels API key");
        let err = generator.generate("house").await.unwrap_err();
        assert!(matches!(err, GenerationError::NotConfigured(_)));
    }
}
