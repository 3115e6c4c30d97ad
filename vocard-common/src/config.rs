//! Bootstrap configuration loading and root folder resolution
//!
//! Settings sources, highest priority first:
//! 1. Command-line arguments
//! 2. Environment variables (`VOCARD_ROOT_FOLDER`, `VOCARD_PEXELS_API_KEY`)
//! 3. TOML configuration file
//! 4. Built-in defaults (code constants)
//!
//! A missing TOML file is not an error: a warning is logged and defaults apply.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "VOCARD_ROOT_FOLDER";

/// Environment variable carrying the Pexels API key
pub const PEXELS_API_KEY_ENV: &str = "VOCARD_PEXELS_API_KEY";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the media directory and asset index database
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Media enrichment tuning (optional)
    #[serde(default)]
    pub enrichment: EnrichmentSettings,

    /// Text-to-speech command used for pronunciation audio (optional)
    #[serde(default)]
    pub audio: AudioCommandConfig,

    /// Pexels API key for illustrative images
    #[serde(default)]
    pub pexels_api_key: Option<String>,

    /// Path to a template descriptor file overriding the built-in templates
    #[serde(default)]
    pub templates: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// What happens to an entity when generating one of its assets fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// The entity cannot be enriched without this asset; processing aborts
    Hard,
    /// The asset is left out of the bag and processing continues
    Soft,
}

/// Enrichment engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentSettings {
    /// Upper bound on entities enriched concurrently (external API backpressure)
    #[serde(default = "default_max_concurrent_entities")]
    pub max_concurrent_entities: usize,

    /// Number of lock stripes guarding cache keys
    #[serde(default = "default_lock_stripes")]
    pub lock_stripes: usize,

    /// Failure policy for pronunciation audio
    #[serde(default = "default_audio_policy")]
    pub audio_policy: FailurePolicy,

    /// Failure policy for illustrative images
    #[serde(default = "default_image_policy")]
    pub image_policy: FailurePolicy,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            max_concurrent_entities: default_max_concurrent_entities(),
            lock_stripes: default_lock_stripes(),
            audio_policy: default_audio_policy(),
            image_policy: default_image_policy(),
        }
    }
}

/// External text-to-speech command
///
/// `{text}` and `{output}` placeholders in `args` are substituted per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioCommandConfig {
    #[serde(default = "default_tts_program")]
    pub program: String,

    #[serde(default = "default_tts_args")]
    pub args: Vec<String>,

    /// File extension of the produced audio
    #[serde(default = "default_tts_extension")]
    pub extension: String,
}

impl Default for AudioCommandConfig {
    fn default() -> Self {
        Self {
            program: default_tts_program(),
            args: default_tts_args(),
            extension: default_tts_extension(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_concurrent_entities() -> usize {
    4
}

fn default_lock_stripes() -> usize {
    64
}

fn default_audio_policy() -> FailurePolicy {
    FailurePolicy::Hard
}

fn default_image_policy() -> FailurePolicy {
    FailurePolicy::Soft
}

fn default_tts_program() -> String {
    "espeak-ng".to_string()
}

fn default_tts_args() -> Vec<String> {
    ["-v", "de", "-w", "{output}", "{text}"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_tts_extension() -> String {
    "wav".to_string()
}

/// Compiled-in defaults for the current platform
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
        }
    }
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("vocard"))
        .unwrap_or_else(|| PathBuf::from("./vocard_data"))
}

/// Default location of the TOML file (`<config dir>/vocard/vocard.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("vocard").join("vocard.toml"))
}

/// Root folder resolution: CLI → ENV → TOML → compiled default
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<PathBuf>, toml_config: &TomlConfig) -> Self {
        Self {
            cli_arg,
            toml_root: toml_config.root_folder.clone(),
        }
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_root {
            return path.clone();
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Layout of directories and files under the resolved root folder
#[derive(Debug, Clone)]
pub struct RootFolderLayout {
    root: PathBuf,
}

impl RootFolderLayout {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory receiving generated audio and images
    pub fn media_dir(&self) -> PathBuf {
        self.root.join("media")
    }

    /// SQLite database holding the asset index
    pub fn database_path(&self) -> PathBuf {
        self.root.join("vocard.db")
    }

    /// Create the root and media directories if missing
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(self.media_dir())?;
        Ok(())
    }
}

/// Load TOML configuration from a file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load TOML configuration, falling back to defaults when the file is absent
///
/// A present but malformed file is still an error.
pub fn load_or_default(path: Option<&Path>) -> Result<TomlConfig> {
    let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => path,
        None => {
            warn!("No configuration directory available, using built-in defaults");
            return Ok(TomlConfig::default());
        }
    };

    if !path.exists() {
        warn!(
            "Configuration file {} not found, using built-in defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let config = load_toml_config(&path)?;
    info!("Configuration loaded from {}", path.display());
    Ok(config)
}

/// Write TOML configuration (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Resolve the Pexels API key (ENV → TOML)
pub fn resolve_pexels_api_key(toml_config: &TomlConfig) -> Option<String> {
    if let Ok(key) = std::env::var(PEXELS_API_KEY_ENV) {
        if is_valid_key(&key) {
            info!("Pexels API key loaded from environment variable");
            return Some(key);
        }
    }

    match &toml_config.pexels_api_key {
        Some(key) if is_valid_key(key) => {
            info!("Pexels API key loaded from TOML config");
            Some(key.clone())
        }
        _ => None,
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// User-Agent for outgoing HTTP requests
pub fn get_user_agent() -> String {
    format!("vocard/{}", env!("CARGO_PKG_VERSION"))
}
