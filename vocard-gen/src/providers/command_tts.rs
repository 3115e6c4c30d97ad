//! Text-to-speech through an external command
//!
//! Runs the configured program once per text, substituting `{text}` and
//! `{output}` in its arguments (default: `espeak-ng -v de -w {output} {text}`).

use super::asset_file_name;
use crate::types::{AssetKind, AssetRef, AudioGenerator, GenerationError};
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;
use vocard_common::config::AudioCommandConfig;

pub struct CommandAudioGenerator {
    config: AudioCommandConfig,
    media_dir: PathBuf,
}

impl CommandAudioGenerator {
    /// Generator writing into `media_dir`
    pub fn new(config: AudioCommandConfig, media_dir: PathBuf) -> Self {
        Self { config, media_dir }
    }

    fn build_args(&self, text: &str, output: &str) -> Vec<String> {
        self.config
            .args
            .iter()
            .map(|arg| arg.replace("{output}", output).replace("{text}", text))
            .collect()
    }
}

#[async_trait::async_trait]
impl AudioGenerator for CommandAudioGenerator {
    fn name(&self) -> &'static str {
        "command-tts"
    }

    async fn generate(&self, text: &str) -> Result<AssetRef, GenerationError> {
        tokio::fs::create_dir_all(&self.media_dir).await?;

        let file_name = asset_file_name(AssetKind::Audio, text, &self.config.extension);
        let output_path = self.media_dir.join(&file_name);
        let args = self.build_args(text, &output_path.to_string_lossy());

        debug!(program = %self.config.program, output = %output_path.display(), "Running TTS command");

        let output = Command::new(&self.config.program)
            .args(&args)
            .output()
            .await
            .map_err(|e| {
                GenerationError::Command(format!("failed to run '{}': {}", self.config.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GenerationError::Command(format!(
                "'{}' exited with {}: {}",
                self.config.program,
                output.status,
                stderr.trim()
            )));
        }

        if !tokio::fs::try_exists(&output_path).await? {
            return Err(GenerationError::Command(format!(
                "'{}' did not write {}",
                self.config.program,
                output_path.display()
            )));
        }

        Ok(AssetRef::new(file_name))
    }
}
