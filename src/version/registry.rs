//! Registry trait for fetching latest package versions from various sources

#[cfg(test)]
use mockall::automock;

use crate::parser::types::Ecosystem;
use crate::version::error::RegistryError;

/// Trait for looking up the latest published version of a package
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Returns the ecosystem this implementation handles
    fn ecosystem(&self) -> Ecosystem;

    /// Fetches the version the registry reports as latest
    ///
    /// # Arguments
    /// * `package_name` - Ecosystem-scoped identifier (e.g., "org.slf4j:slf4j-api" for Maven)
    ///
    /// # Returns
    /// * `Ok(String)` - The registry's notion of "latest"; not necessarily the semver maximum
    /// * `Err(RegistryError::NotFound)` - The registry reports the package as absent
    /// * `Err(RegistryError)` - Any other failure
    async fn fetch_latest_version(&self, package_name: &str) -> Result<String, RegistryError>;
}
