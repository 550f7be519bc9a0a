//! npm registry API implementation

use std::collections::HashMap;

use crate::parser::types::Ecosystem;
use crate::version::error::RegistryError;
use crate::version::registries::{check_status, render_url};
use crate::version::registry::Registry;
use serde::Deserialize;
use tracing::{debug, warn};

/// Default URL template for npm registry
pub const DEFAULT_URL_TEMPLATE: &str = "https://registry.npmjs.org/{package}";

/// Response from npm registry API
#[derive(Debug, Deserialize)]
struct NpmPackageResponse {
    #[serde(rename = "dist-tags", default)]
    dist_tags: HashMap<String, String>,
}

/// Registry implementation for npm registry API
pub struct NpmRegistry {
    client: reqwest::Client,
    url_template: String,
}

impl NpmRegistry {
    /// Creates a new NpmRegistry with a custom URL template
    pub fn new(url_template: &str, client: reqwest::Client) -> Self {
        Self {
            client,
            url_template: url_template.to_string(),
        }
    }

    /// Encode package name for URL (handles scoped packages)
    fn encode_package_name(package_name: &str) -> String {
        if package_name.starts_with('@') {
            // Scoped package: @scope/name -> @scope%2Fname
            package_name.replace('/', "%2F")
        } else {
            package_name.to_string()
        }
    }
}

impl Default for NpmRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_URL_TEMPLATE, reqwest::Client::new())
    }
}

#[async_trait::async_trait]
impl Registry for NpmRegistry {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Node
    }

    async fn fetch_latest_version(&self, package_name: &str) -> Result<String, RegistryError> {
        let encoded_name = Self::encode_package_name(package_name);
        let url = render_url(&self.url_template, &[("package", &encoded_name)]);
        debug!("Fetching npm package: {}", url);

        let response = self.client.get(&url).send().await?;
        check_status(&response, package_name, "npm registry")?;

        let package_info: NpmPackageResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse npm registry response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        package_info
            .dist_tags
            .get("latest")
            .cloned()
            .ok_or_else(|| {
                RegistryError::InvalidResponse(format!(
                    "No dist-tags.latest for {}",
                    package_name
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn registry_for(server: &Server) -> NpmRegistry {
        NpmRegistry::new(&format!("{}/{{package}}", server.url()), reqwest::Client::new())
    }

    #[tokio::test]
    async fn fetch_latest_version_returns_dist_tag_latest() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/express")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "name": "express",
                    "dist-tags": { "latest": "5.0.0", "next": "5.1.0-beta.1" },
                    "versions": { "4.17.1": {}, "5.0.0": {}, "5.1.0-beta.1": {} }
                }"#,
            )
            .create_async()
            .await;

        let result = registry_for(&server)
            .fetch_latest_version("express")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, "5.0.0");
    }

    #[tokio::test]
    async fn fetch_latest_version_returns_not_found_for_nonexistent_package() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/nonexistent-package")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Not found"}"#)
            .create_async()
            .await;

        let result = registry_for(&server)
            .fetch_latest_version("nonexistent-package")
            .await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }

    #[tokio::test]
    async fn fetch_latest_version_handles_scoped_package() {
        let mut server = Server::new_async().await;

        // Scoped packages use URL encoding: @types/node -> @types%2Fnode
        let mock = server
            .mock("GET", "/@types%2Fnode")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{ "name": "@types/node", "dist-tags": { "latest": "20.0.0" } }"#)
            .create_async()
            .await;

        let result = registry_for(&server)
            .fetch_latest_version("@types/node")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, "20.0.0");
    }

    #[tokio::test]
    async fn fetch_latest_version_returns_invalid_response_without_latest_tag() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/untagged")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{ "name": "untagged", "versions": {} }"#)
            .create_async()
            .await;

        let result = registry_for(&server).fetch_latest_version("untagged").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn fetch_latest_version_returns_rate_limited_with_retry_after() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/busy")
            .with_status(429)
            .with_header("retry-after", "30")
            .create_async()
            .await;

        let result = registry_for(&server).fetch_latest_version("busy").await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(RegistryError::RateLimited {
                retry_after_secs: Some(30)
            })
        ));
    }
}
