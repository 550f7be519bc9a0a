//! PyPI registry client for fetching Python package versions

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::parser::types::Ecosystem;
use crate::version::error::RegistryError;
use crate::version::registries::{check_status, render_url};
use crate::version::registry::Registry;

/// Default URL template for the PyPI JSON API
pub const DEFAULT_URL_TEMPLATE: &str = "https://pypi.org/pypi/{package}/json";

/// PyPI registry client
pub struct PypiRegistry {
    client: Client,
    url_template: String,
}

impl Default for PypiRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_URL_TEMPLATE, Client::new())
    }
}

impl PypiRegistry {
    pub fn new(url_template: &str, client: Client) -> Self {
        Self {
            client,
            url_template: url_template.to_string(),
        }
    }
}

/// PyPI JSON API response structure
#[derive(Debug, Deserialize)]
struct PypiResponse {
    info: PypiInfo,
}

/// Package information from PyPI
#[derive(Debug, Deserialize)]
struct PypiInfo {
    /// Latest version (according to PyPI)
    version: String,
}

#[async_trait]
impl Registry for PypiRegistry {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Python
    }

    async fn fetch_latest_version(&self, package_name: &str) -> Result<String, RegistryError> {
        let url = render_url(&self.url_template, &[("package", package_name)]);
        debug!("Fetching PyPI package: {}", url);

        let response = self.client.get(&url).send().await?;
        check_status(&response, package_name, "PyPI")?;

        let pypi_response: PypiResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::InvalidResponse(e.to_string()))?;

        debug!(
            "PyPI reports {} as latest for {}",
            pypi_response.info.version, package_name
        );

        Ok(pypi_response.info.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn registry_for(server: &Server) -> PypiRegistry {
        PypiRegistry::new(&format!("{}/pypi/{{package}}/json", server.url()), Client::new())
    }

    #[tokio::test]
    async fn fetch_latest_version_returns_info_version() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pypi/requests/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "info": {"version": "2.32.5"},
                    "releases": {
                        "2.31.0": [],
                        "2.32.5": [],
                        "3.0.0a1": []
                    }
                }"#,
            )
            .create_async()
            .await;

        let result = registry_for(&server)
            .fetch_latest_version("requests")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, "2.32.5");
    }

    #[tokio::test]
    async fn fetch_latest_version_returns_not_found_for_missing_package() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pypi/nonexistent/json")
            .with_status(404)
            .create_async()
            .await;

        let result = registry_for(&server).fetch_latest_version("nonexistent").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }

    #[tokio::test]
    async fn fetch_latest_version_returns_invalid_response_without_info() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pypi/broken/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"releases": {}}"#)
            .create_async()
            .await;

        let result = registry_for(&server).fetch_latest_version("broken").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn fetch_latest_version_handles_network_error() {
        // Use an invalid URL to trigger a network error
        let registry = PypiRegistry::new(
            "http://invalid.localhost.test:99999/pypi/{package}/json",
            Client::new(),
        );
        let result = registry.fetch_latest_version("requests").await;

        assert!(matches!(result, Err(RegistryError::Network(_))));
    }
}
