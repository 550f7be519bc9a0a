use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::parser::types::Ecosystem;
use crate::version::registries::{go_proxy, maven, npm, pypi, rubygems};
use crate::version::vulnerability;

// =============================================================================
// Defaults
// =============================================================================

/// Configuration file read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Per-request HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Number of dependency lookups in flight at once
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// Environment variable holding the VulnCheck bearer token
pub const VULNCHECK_API_TOKEN_ENV_VAR: &str = "VULNCHECK_API_TOKEN";

/// File name of the version cache inside the data directory
pub const CACHE_FILE_NAME: &str = "version_cache.json";

/// File name of the log file inside the data directory
pub const LOG_FILE_NAME: &str = "dependency-report.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Report configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ReportConfig {
    /// Markdown report destination
    pub output_file: PathBuf,
    pub directories: Vec<DirectoryConfig>,
    /// Version cache document; defaults to the data directory
    #[serde(default)]
    pub cache_file: Option<PathBuf>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default)]
    pub registries: RegistriesConfig,
}

/// A project directory and the ecosystems to analyze in it
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DirectoryConfig {
    pub path: PathBuf,
    /// Environment names as written (`Node.js`, `Python`, `Ruby`, `Maven`, `Go`)
    pub environments: Vec<String>,
}

impl DirectoryConfig {
    pub fn new(path: impl Into<PathBuf>, ecosystems: &[Ecosystem]) -> Self {
        Self {
            path: path.into(),
            environments: ecosystems
                .iter()
                .map(|ecosystem| ecosystem.display_name().to_string())
                .collect(),
        }
    }

    /// Ecosystems to analyze, in configured order; unsupported names are skipped
    pub fn ecosystems(&self) -> Vec<Ecosystem> {
        self.environments
            .iter()
            .filter_map(|name| name.parse().ok())
            .collect()
    }
}

/// Registry URL templates, overridable to point at mirrors
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegistriesConfig {
    #[serde(rename = "Npm")]
    pub npm: String,
    #[serde(rename = "PyPI")]
    pub pypi: String,
    #[serde(rename = "RubyGems")]
    pub rubygems: String,
    #[serde(rename = "Maven")]
    pub maven: String,
    #[serde(rename = "Go")]
    pub go: String,
    #[serde(rename = "VulnCheck")]
    pub vulncheck: String,
}

impl Default for RegistriesConfig {
    fn default() -> Self {
        Self {
            npm: npm::DEFAULT_URL_TEMPLATE.to_string(),
            pypi: pypi::DEFAULT_URL_TEMPLATE.to_string(),
            rubygems: rubygems::DEFAULT_URL_TEMPLATE.to_string(),
            maven: maven::DEFAULT_URL_TEMPLATE.to_string(),
            go: go_proxy::DEFAULT_URL_TEMPLATE.to_string(),
            vulncheck: vulnerability::DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl RegistriesConfig {
    /// URL template for an ecosystem's registry
    pub fn template(&self, ecosystem: Ecosystem) -> &str {
        match ecosystem {
            Ecosystem::Node => &self.npm,
            Ecosystem::Python => &self.pypi,
            Ecosystem::Ruby => &self.rubygems,
            Ecosystem::Maven => &self.maven,
            Ecosystem::Go => &self.go,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for ecosystem in Ecosystem::ALL {
            let template = self.template(ecosystem);
            let placeholders: &[&str] = match ecosystem {
                Ecosystem::Maven => &["{group_id}", "{artifact_id}"],
                _ => &["{package}"],
            };
            if let Some(missing) = placeholders.iter().find(|p| !template.contains(**p)) {
                return Err(ConfigError::Invalid(format!(
                    "Registries.{}: template {:?} lacks {}",
                    ecosystem.display_name(),
                    template,
                    missing
                )));
            }
        }

        reqwest::Url::parse(&self.vulncheck).map_err(|e| {
            ConfigError::Invalid(format!("Registries.VulnCheck: {:?} is not a URL: {}", self.vulncheck, e))
        })?;

        Ok(())
    }
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

impl ReportConfig {
    /// Structural validation; directories are not checked for existence
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("OutputFile must not be empty".to_string()));
        }

        if self.directories.is_empty() {
            return Err(ConfigError::Invalid(
                "Directories must list at least one entry".to_string(),
            ));
        }

        for (i, directory) in self.directories.iter().enumerate() {
            if directory.path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "Directories[{}].Path must not be empty",
                    i
                )));
            }
            if directory.environments.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "Directories[{}].Environments must not be empty ({})",
                    i,
                    directory.path.display()
                )));
            }
            if let Some(unsupported) = directory
                .environments
                .iter()
                .find(|name| name.parse::<Ecosystem>().is_err())
            {
                return Err(ConfigError::Invalid(format!(
                    "Directories[{}].Environments: unsupported environment {:?} ({})",
                    i,
                    unsupported,
                    directory.path.display()
                )));
            }
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "TimeoutSeconds must be greater than zero".to_string(),
            ));
        }

        if self.max_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "MaxConcurrency must be greater than zero".to_string(),
            ));
        }

        self.registries.validate()
    }

    /// Location of the version cache document
    pub fn cache_path(&self) -> PathBuf {
        self.cache_file.clone().unwrap_or_else(cache_path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Read, parse and validate a configuration file
pub fn load_config(path: &Path) -> Result<ReportConfig, ConfigError> {
    info!("Loading configuration from {:?}", path);

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let config: ReportConfig =
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

    config.validate()?;
    debug!("Configuration: {:?}", config);

    Ok(config)
}

/// Reads the VulnCheck token from the environment; blank values count as absent
pub fn vulncheck_token() -> Option<String> {
    std::env::var(VULNCHECK_API_TOKEN_ENV_VAR)
        .ok()
        .filter(|token| !token.trim().is_empty())
}

/// Returns the path to the data directory for dependency-report.
/// Uses $XDG_DATA_HOME/dependency-report if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/dependency-report,
/// or ./dependency-report if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the default path to the version cache document.
pub fn cache_path() -> PathBuf {
    data_dir().join(CACHE_FILE_NAME)
}

/// Returns the default path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join(LOG_FILE_NAME)
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("dependency-report")
}
