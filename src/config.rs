use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{Result, SubtransError};

/// Environment variable overriding the oracle binary path
pub const ENV_ORACLE_BIN: &str = "CODEX_BIN";
/// Environment variable selecting the oracle model
pub const ENV_ORACLE_MODEL: &str = "CODEX_MODEL";

/// Default number of subtitle blocks sent to the oracle per request
pub const DEFAULT_BATCH_SIZE: usize = 50;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub oracle: OracleConfig,
    pub translate: TranslateConfig,
    pub discovery: DiscoveryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Path to the agent binary (e.g., codex)
    pub binary_path: String,
    /// Model identifier passed through to the agent, if any
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// Subtitle blocks per translation request
    pub batch_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Subtitle file extension, without the leading dot
    pub extension: String,
    /// Suffix replacing `.<extension>` in the output file name
    pub output_suffix: String,
    /// File name endings that mark an already translated file
    pub translated_markers: Vec<String>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            binary_path: "/opt/codex/bin/codex".to_string(),
            model: None,
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            source_language: "en".to_string(),
            target_language: "ru".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self::for_language("srt", "ru")
    }
}

impl DiscoveryConfig {
    /// Naming convention `<name>.<lang>.<ext>`, also recognizing `<name>_<lang>.<ext>`
    pub fn for_language(extension: &str, language: &str) -> Self {
        Self {
            extension: extension.to_string(),
            output_suffix: format!(".{}.{}", language, extension),
            translated_markers: vec![
                format!(".{}.{}", language, extension),
                format!("_{}.{}", language, extension),
            ],
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SubtransError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| SubtransError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SubtransError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| SubtransError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Apply `CODEX_BIN` / `CODEX_MODEL` from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bin) = lookup(ENV_ORACLE_BIN).filter(|v| !v.trim().is_empty()) {
            debug!("Oracle binary overridden by {}: {}", ENV_ORACLE_BIN, bin);
            self.oracle.binary_path = bin;
        }
        if let Some(model) = lookup(ENV_ORACLE_MODEL).filter(|v| !v.trim().is_empty()) {
            debug!("Oracle model overridden by {}: {}", ENV_ORACLE_MODEL, model);
            self.oracle.model = Some(model);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.oracle.binary_path.trim().is_empty() {
            return Err(SubtransError::Config("Oracle binary path must not be empty".to_string()));
        }
        if self.translate.batch_size == 0 {
            return Err(SubtransError::Config("Batch size must be at least 1".to_string()));
        }
        if self.discovery.extension.trim().is_empty() {
            return Err(SubtransError::Config("Subtitle extension must not be empty".to_string()));
        }
        if self.discovery.output_suffix.trim().is_empty() {
            return Err(SubtransError::Config("Output suffix must not be empty".to_string()));
        }
        Ok(())
    }
}
