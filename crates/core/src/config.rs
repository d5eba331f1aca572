//! Configuration management for the IntelliRAG client.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Defaults
//! - Config files (.intellirag/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources override earlier ones.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Backend used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Upper bound for a single `/qa` or `/index-pdf` round-trip.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory searched for `.intellirag/config.yaml`
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Base URL of the question-answering service
    pub api_base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    api: Option<ApiConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ApiConfig {
    #[serde(rename = "baseUrl")]
    base_url: Option<String>,
    #[serde(rename = "timeoutSecs")]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML file and environment variables.
    ///
    /// Environment variables:
    /// - `INTELLIRAG_WORKSPACE`: Directory holding `.intellirag/`
    /// - `INTELLIRAG_CONFIG`: Path to config file
    /// - `INTELLIRAG_BACKEND_URL` / `INTELLIRAG_API_BASE_URL`: Service base URL
    /// - `INTELLIRAG_TIMEOUT_SECS`: Request timeout
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use intellirag_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Backend: {}", config.api_base_url);
    /// ```
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("INTELLIRAG_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("INTELLIRAG_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        let config_path = config.config_path();
        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file does not exist: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Some(url) = resolve_base_url(
            std::env::var("INTELLIRAG_BACKEND_URL").ok(),
            std::env::var("INTELLIRAG_API_BASE_URL").ok(),
        ) {
            config.api_base_url = url;
        }

        if let Ok(timeout) = std::env::var("INTELLIRAG_TIMEOUT_SECS") {
            config.timeout_secs = timeout.trim().parse().map_err(|_| {
                AppError::Config(format!("INTELLIRAG_TIMEOUT_SECS is not a number: {}", timeout))
            })?;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var_os("NO_COLOR").is_some() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Path of the YAML file consulted by [`AppConfig::load`].
    pub fn config_path(&self) -> PathBuf {
        self.config_file
            .clone()
            .unwrap_or_else(|| self.workspace.join(".intellirag").join("config.yaml"))
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let merged = self.merge_yaml_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        tracing::debug!(
            path = ?path,
            api_base_url = %merged.api_base_url,
            "Merged config file"
        );

        Ok(merged)
    }

    fn merge_yaml_str(&self, contents: &str) -> AppResult<Self> {
        let config_file: ConfigFile = if contents.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(contents)?
        };

        let mut result = self.clone();

        if let Some(api) = config_file.api {
            if let Some(url) = api.base_url.and_then(non_blank) {
                result.api_base_url = url;
            }
            if let Some(timeout) = api.timeout_secs {
                result.timeout_secs = timeout;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and the
    /// config file.
    pub fn with_overrides(
        mut self,
        api_base_url: Option<String>,
        timeout_secs: Option<u64>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(url) = api_base_url.and_then(non_blank) {
            self.api_base_url = url;
        }

        if let Some(timeout) = timeout_secs {
            self.timeout_secs = timeout;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate the final configuration before any request is made.
    pub fn validate(&self) -> AppResult<()> {
        let url = self.api_base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "API base URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(AppError::Config(
                "Request timeout must be at least one second".to_string(),
            ));
        }

        Ok(())
    }
}

/// Pick the service URL from the two supported environment variables.
///
/// `INTELLIRAG_BACKEND_URL` wins over `INTELLIRAG_API_BASE_URL`; values are
/// trimmed and blank values are ignored.
pub fn resolve_base_url(backend_url: Option<String>, api_base_url: Option<String>) -> Option<String> {
    backend_url
        .and_then(non_blank)
        .or_else(|| api_base_url.and_then(non_blank))
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
