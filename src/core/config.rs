use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::auth::gate::Credentials;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub auth: Credentials,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    Journal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: BackendKind,
    pub path: Option<PathBuf>,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    pub quota_bytes: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_pdf_bytes")]
    pub max_pdf_bytes: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    #[serde(default = "default_seed_defaults")]
    pub defaults: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_console")]
    pub console: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_pdf_bytes: default_max_pdf_bytes(),
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            defaults: default_seed_defaults(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            console: default_console(),
        }
    }
}

// Default value functions
fn default_backend() -> BackendKind {
    BackendKind::Journal
}

fn default_namespace() -> String {
    "electricien".to_string()
}

fn default_max_pdf_bytes() -> u64 {
    10 * 1024 * 1024 // 10 MiB
}

fn default_seed_defaults() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "console".to_string()
}

fn default_console() -> bool {
    false
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate storage config
        if self.storage.backend == BackendKind::Journal && self.storage.path.is_none() {
            bail!("storage.path must be set when the journal backend is selected");
        }

        if self.storage.namespace.is_empty() {
            bail!("storage.namespace must not be empty");
        }

        if self.storage.namespace.contains('|') {
            bail!("storage.namespace must not contain '|'");
        }

        if let Some(quota) = self.storage.quota_bytes {
            if quota == 0 {
                bail!("storage.quota_bytes must be greater than 0");
            }
        }

        // Validate auth config
        if self.auth.email.is_empty() {
            bail!("auth.email must not be empty");
        }

        if self.auth.password.is_empty() {
            bail!("auth.password must not be empty");
        }

        // Validate upload config
        if self.uploads.max_pdf_bytes == 0 {
            bail!("uploads.max_pdf_bytes must be greater than 0");
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        let valid_formats = ["json", "console"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: json, console",
                self.logging.format
            );
        }

        Ok(())
    }
}
