//! Registry test utilities

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tempfile::TempDir;

use dependency_report::parser::types::Ecosystem;
use dependency_report::version::cache::VersionCache;
use dependency_report::version::error::RegistryError;
use dependency_report::version::registry::Registry;

/// Mock registry for testing
///
/// Unknown packages are reported as not found; packages registered with
/// `with_failure` fail with an invalid response.
pub struct MockRegistry {
    ecosystem: Ecosystem,
    latest: HashMap<String, String>,
    failing: Vec<String>,
    calls: AtomicUsize,
}

impl MockRegistry {
    pub fn new(ecosystem: Ecosystem) -> Self {
        Self {
            ecosystem,
            latest: HashMap::new(),
            failing: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_latest(mut self, package: &str, version: &str) -> Self {
        self.latest.insert(package.to_string(), version.to_string());
        self
    }

    pub fn with_failure(mut self, package: &str) -> Self {
        self.failing.push(package.to_string());
        self
    }

    /// Number of fetches that reached the registry
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Registry for MockRegistry {
    fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }

    async fn fetch_latest_version(&self, package_name: &str) -> Result<String, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.iter().any(|p| p == package_name) {
            return Err(RegistryError::InvalidResponse(format!(
                "malformed metadata for {}",
                package_name
            )));
        }

        match self.latest.get(package_name) {
            Some(version) => Ok(version.clone()),
            None => Err(RegistryError::NotFound(package_name.to_string())),
        }
    }
}

/// Create a test cache with pre-populated entries
pub fn create_test_cache(entries: &[(Ecosystem, &str, &str)]) -> (TempDir, Arc<VersionCache>) {
    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("version_cache.json");
    let cache = VersionCache::open(&cache_path).unwrap();

    for (ecosystem, package_name, version) in entries {
        cache
            .set(&VersionCache::key(*ecosystem, package_name), version)
            .unwrap();
    }

    (temp_dir, Arc::new(cache))
}
