//! Report generation facade
//!
//! Wires configuration, the version cache, registry clients and the
//! resolution pipeline together and writes one Markdown report covering
//! every configured directory and ecosystem.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::{ConfigError, ReportConfig, load_config, vulncheck_token};
use crate::parser::load_dependencies;
use crate::parser::types::Ecosystem;
use crate::report::ReportWriter;
use crate::version::cache::VersionCache;
use crate::version::error::CacheError;
use crate::version::pipeline::ResolutionPipeline;
use crate::version::registries::build_http_client;
use crate::version::resolver::create_registries;
use crate::version::vulnerability::VulnerabilityChecker;

/// Failures that abort report generation as a whole
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to open version cache: {0}")]
    Cache(#[from] CacheError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to write report {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub struct ReportGenerator {
    config: ReportConfig,
    vulncheck_token: Option<String>,
}

impl ReportGenerator {
    pub fn new(config: ReportConfig, vulncheck_token: Option<String>) -> Self {
        Self {
            config,
            vulncheck_token,
        }
    }

    /// Load the configuration file and read the API token from the environment
    pub fn from_config_file(path: &Path) -> Result<Self, ReportError> {
        let config = load_config(path)?;
        Ok(Self::new(config, vulncheck_token()))
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Analyze every configured directory and write the report.
    ///
    /// Per-directory and per-ecosystem problems become error sections in the
    /// report; only systemic failures (cache location, HTTP client, report
    /// file) are returned. Returns the path of the written report.
    pub async fn run(&self) -> Result<PathBuf, ReportError> {
        let config = &self.config;
        info!(
            "Generating dependency report for {} directories",
            config.directories.len()
        );

        let cache = Arc::new(VersionCache::open(&config.cache_path())?);
        let client = build_http_client(config.timeout())?;

        if self.vulncheck_token.is_none() {
            warn!("VulnCheck API token not set; vulnerability checks will be skipped");
        }
        let checker = Arc::new(VulnerabilityChecker::new(
            &config.registries.vulncheck,
            self.vulncheck_token.clone(),
            client.clone(),
        ));

        let pipeline = ResolutionPipeline::new(cache, checker, config.max_concurrency);
        let registries = create_registries(&config.registries, &client);

        let writer = ReportWriter::new(&config.output_file);
        let write_err = |source| ReportError::Write {
            path: writer.path().display().to_string(),
            source,
        };
        writer.initialize().map_err(write_err)?;

        let mut processed = HashSet::new();
        for directory in &config.directories {
            let label = directory.path.display().to_string();

            if !processed.insert(directory.path.clone()) {
                warn!("Directory {} already processed, skipping duplicate entry", label);
                continue;
            }

            if !directory.path.is_dir() {
                warn!("Directory not found: {}, skipping", label);
                append_error(&writer, &format!("Directory not found: {}", label));
                continue;
            }

            info!("Processing directory: {}", label);

            for ecosystem in directory.ecosystems() {
                let Some(registry) = registries.get(&ecosystem) else {
                    continue;
                };

                let manifest = match load_dependencies(ecosystem, &directory.path) {
                    Ok(Some(manifest)) => manifest,
                    Ok(None) => {
                        info!("No {} manifest in {}, skipping", ecosystem, label);
                        continue;
                    }
                    Err(e) => {
                        error!("Error analyzing {} dependencies in {}: {}", ecosystem, label, e);
                        append_error(
                            &writer,
                            &analysis_error(ecosystem, &label, &e.to_string()),
                        );
                        continue;
                    }
                };

                info!(
                    "Analyzing {} dependencies from {} in {}",
                    manifest.dependencies.len(),
                    manifest.source,
                    label
                );

                let results = pipeline
                    .resolve_all(Arc::clone(registry), manifest.dependencies)
                    .await;

                writer
                    .append_section(ecosystem, &label, &results)
                    .map_err(write_err)?;
            }
        }

        writer.finalize().map_err(write_err)?;

        info!("Dependency report written to {}", writer.path().display());
        Ok(writer.path().to_path_buf())
    }
}

fn analysis_error(ecosystem: Ecosystem, directory: &str, reason: &str) -> String {
    format!(
        "Error analyzing {} dependencies in {}: {}",
        ecosystem, directory, reason
    )
}

/// Error sections are best effort; a failed write is only logged
fn append_error(writer: &ReportWriter, message: &str) {
    if let Err(e) = writer.append_error(message) {
        error!("Error appending to report file: {}", e);
    }
}
