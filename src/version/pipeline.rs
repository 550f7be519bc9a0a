//! Concurrent latest-version and vulnerability resolution for one manifest
//!
//! Each declared dependency becomes one unit of work: a cache-backed
//! latest-version lookup followed by a vulnerability lookup conditioned on
//! the declared version. Units run on spawned tasks bounded by a semaphore
//! and are collected in completion order. A failing or panicking unit turns
//! into an error result; it never aborts the batch.

use std::sync::Arc;

use futures::FutureExt;
use futures::stream::{FuturesUnordered, StreamExt};
use indexmap::IndexMap;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::version::cache::VersionCache;
use crate::version::error::RegistryError;
use crate::version::pinning::is_pinned_version;
use crate::version::registry::Registry;
use crate::version::types::{LatestVersion, LookupResult, VulnerabilityStatus};
use crate::version::vulnerability::VulnerabilityChecker;

/// Resolve the latest version of `package_name`, consulting the cache first.
///
/// Successful lookups are written through to the cache; failures are never
/// cached. A cache write failure is logged and does not fail the lookup.
pub async fn resolve_latest(
    cache: &VersionCache,
    registry: &dyn Registry,
    package_name: &str,
) -> LatestVersion {
    let key = VersionCache::key(registry.ecosystem(), package_name);

    match cache.get(&key) {
        Ok(Some(version)) => {
            debug!("Cache hit for {}: {}", key, version);
            return LatestVersion::Resolved(version);
        }
        Ok(None) => {}
        Err(e) => warn!("Cache read failed for {}: {}", key, e),
    }

    match registry.fetch_latest_version(package_name).await {
        Ok(version) => {
            if let Err(e) = cache.set(&key, &version) {
                warn!("Failed to cache {} = {}: {}", key, version, e);
            }
            LatestVersion::Resolved(version)
        }
        Err(RegistryError::NotFound(_)) => {
            info!(
                "Package not found in {} registry: {}",
                registry.ecosystem().as_str(),
                package_name
            );
            LatestVersion::NotFound
        }
        Err(e) => {
            error!("Failed to fetch latest version for {}: {}", key, e);
            LatestVersion::Error
        }
    }
}

/// Vulnerability outcome for a dependency given its latest-version outcome
async fn check_vulnerabilities(
    checker: &VulnerabilityChecker,
    registry: &dyn Registry,
    package_name: &str,
    declared_version: &str,
    latest_version: &LatestVersion,
) -> VulnerabilityStatus {
    match latest_version {
        LatestVersion::Error => VulnerabilityStatus::Processing,
        _ if is_pinned_version(declared_version) => {
            checker
                .fetch(registry.ecosystem(), package_name, declared_version)
                .await
        }
        LatestVersion::Resolved(_) => VulnerabilityStatus::VersionRange,
        LatestVersion::NotFound => VulnerabilityStatus::LookupFailed,
    }
}

/// Bounded fan-out of lookups over a shared cache and vulnerability client
pub struct ResolutionPipeline {
    cache: Arc<VersionCache>,
    vulnerabilities: Arc<VulnerabilityChecker>,
    max_concurrency: usize,
}

impl ResolutionPipeline {
    pub fn new(
        cache: Arc<VersionCache>,
        vulnerabilities: Arc<VulnerabilityChecker>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            cache,
            vulnerabilities,
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn cache(&self) -> &VersionCache {
        &self.cache
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Cache-backed latest-version lookup for a single package
    pub async fn resolve_latest(
        &self,
        registry: &dyn Registry,
        package_name: &str,
    ) -> LatestVersion {
        resolve_latest(&self.cache, registry, package_name).await
    }

    /// Resolve every dependency, returning one result per input entry.
    ///
    /// Results arrive in completion order, not input order.
    pub async fn resolve_all(
        &self,
        registry: Arc<dyn Registry>,
        dependencies: IndexMap<String, String>,
    ) -> Vec<LookupResult> {
        let ecosystem = registry.ecosystem();
        info!(
            "Resolving {} {} dependencies (max {} concurrent)",
            dependencies.len(),
            ecosystem.display_name(),
            self.max_concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut units = FuturesUnordered::new();

        for (name, declared_version) in dependencies {
            let cache = Arc::clone(&self.cache);
            let vulnerabilities = Arc::clone(&self.vulnerabilities);
            let registry = Arc::clone(&registry);
            let semaphore = Arc::clone(&semaphore);
            let unit_name = name.clone();
            let unit_version = declared_version.clone();

            let handle = tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return LookupResult::failed(unit_name, unit_version);
                };

                let latest_version =
                    resolve_latest(&cache, registry.as_ref(), &unit_name).await;
                let vulnerabilities = check_vulnerabilities(
                    &vulnerabilities,
                    registry.as_ref(),
                    &unit_name,
                    &unit_version,
                    &latest_version,
                )
                .await;

                LookupResult {
                    name: unit_name,
                    declared_version: unit_version,
                    latest_version,
                    vulnerabilities,
                }
            });

            units.push(handle.map(move |joined| (name, declared_version, joined)));
        }

        let mut results = Vec::with_capacity(units.len());
        while let Some((name, declared_version, joined)) = units.next().await {
            match joined {
                Ok(result) => {
                    debug!("Resolved {}: {}", result.name, result.latest_version);
                    results.push(result);
                }
                Err(e) => {
                    error!("Lookup task for {} failed: {}", name, e);
                    results.push(LookupResult::failed(name, declared_version));
                }
            }
        }

        info!(
            "Finished {} dependencies: {} results",
            ecosystem.display_name(),
            results.len()
        );
        results
    }
}
