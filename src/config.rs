//! Configuration management for the resume ranker

use crate::error::{Result, ResumeRankerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_ENDPOINT: &str = "RESUME_RANKER_ENDPOINT";
pub const ENV_API_KEY: &str = "RESUME_RANKER_API_KEY";
pub const ENV_MODEL_ID: &str = "RESUME_RANKER_MODEL_ID";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub processing: ProcessingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub backend: ExtractionBackend,
    pub endpoint: String,
    pub api_key: String,
    pub model_id: String,
    pub api_version: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// First retry delay; doubled on every further attempt
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    pub poll_interval_ms: u64,
    pub max_polls: u32,
}

fn default_retry_backoff_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionBackend {
    /// Read pre-extracted field trees from JSON files
    Json,
    /// Call a Form Recognizer compatible document analysis service
    FormRecognizer,
}

impl ExtractionBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionBackend::Json => "json",
            ExtractionBackend::FormRecognizer => "form-recognizer",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub concurrency: usize,
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extraction: ExtractionConfig {
                backend: ExtractionBackend::Json,
                endpoint: String::new(),
                api_key: String::new(),
                model_id: "resume-fields".to_string(),
                api_version: "2023-07-31".to_string(),
                timeout_secs: 60,
                max_retries: 3,
                retry_backoff_ms: default_retry_backoff_ms(),
                poll_interval_ms: 1000,
                max_polls: 120,
            },
            processing: ProcessingConfig {
                concurrency: 4,
                extensions: vec!["pdf".to_string(), "json".to_string()],
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from `path` or the default location, writing defaults on first use.
    /// Environment overrides are applied after loading and never saved.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)?
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            config
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ResumeRankerError::Configuration(format!("Failed to parse config: {}", e)))
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeRankerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-ranker")
            .join("config.toml")
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var(ENV_ENDPOINT) {
            self.extraction.endpoint = endpoint;
        }
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            self.extraction.api_key = key;
        }
        if let Ok(model_id) = std::env::var(ENV_MODEL_ID) {
            self.extraction.model_id = model_id;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.processing.concurrency == 0 {
            return Err(ResumeRankerError::Configuration(
                "processing.concurrency must be at least 1".to_string(),
            ));
        }
        if self.processing.extensions.is_empty() {
            return Err(ResumeRankerError::Configuration(
                "processing.extensions must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl ExtractionConfig {
    /// Checks the settings the remote backend cannot run without.
    pub fn require_remote(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("endpoint", self.endpoint.is_empty()),
            ("api_key", self.api_key.is_empty()),
            ("model_id", self.model_id.is_empty()),
        ]
        .iter()
        .filter(|(_, empty)| *empty)
        .map(|(name, _)| *name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ResumeRankerError::Configuration(format!(
                "extraction backend 'form-recognizer' needs: {} (set in config or via {}/{}/{})",
                missing.join(", "),
                ENV_ENDPOINT,
                ENV_API_KEY,
                ENV_MODEL_ID
            )))
        }
    }
}
