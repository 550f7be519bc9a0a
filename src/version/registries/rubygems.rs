//! RubyGems.org API implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::parser::types::Ecosystem;
use crate::version::error::RegistryError;
use crate::version::registries::{check_status, render_url};
use crate::version::registry::Registry;

/// Default URL template for the RubyGems gem info endpoint
pub const DEFAULT_URL_TEMPLATE: &str = "https://rubygems.org/api/v1/gems/{package}.json";

/// Gem metadata returned by `/api/v1/gems/<name>.json`
#[derive(Debug, Deserialize)]
struct GemInfoResponse {
    version: String,
}

/// RubyGems registry client
pub struct RubyGemsRegistry {
    client: Client,
    url_template: String,
}

impl RubyGemsRegistry {
    pub fn new(url_template: &str, client: Client) -> Self {
        Self {
            client,
            url_template: url_template.to_string(),
        }
    }
}

impl Default for RubyGemsRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_URL_TEMPLATE, Client::new())
    }
}

#[async_trait]
impl Registry for RubyGemsRegistry {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Ruby
    }

    async fn fetch_latest_version(&self, package_name: &str) -> Result<String, RegistryError> {
        let url = render_url(&self.url_template, &[("package", package_name)]);
        debug!("Fetching gem info: {}", url);

        let response = self.client.get(&url).send().await?;
        check_status(&response, package_name, "RubyGems")?;

        let gem: GemInfoResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::InvalidResponse(e.to_string()))?;

        Ok(gem.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn registry_for(server: &Server) -> RubyGemsRegistry {
        RubyGemsRegistry::new(
            &format!("{}/api/v1/gems/{{package}}.json", server.url()),
            Client::new(),
        )
    }

    #[tokio::test]
    async fn fetch_latest_version_returns_gem_version() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/gems/rails.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "rails", "version": "7.1.3", "downloads": 1}"#)
            .create_async()
            .await;

        let result = registry_for(&server)
            .fetch_latest_version("rails")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, "7.1.3");
    }

    #[tokio::test]
    async fn fetch_latest_version_returns_not_found_for_unknown_gem() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/gems/no-such-gem.json")
            .with_status(404)
            .with_body("This rubygem could not be found.")
            .create_async()
            .await;

        let result = registry_for(&server).fetch_latest_version("no-such-gem").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }

    #[tokio::test]
    async fn fetch_latest_version_returns_invalid_response_without_version() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/gems/odd.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "odd"}"#)
            .create_async()
            .await;

        let result = registry_for(&server).fetch_latest_version("odd").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn fetch_latest_version_maps_server_error_to_invalid_response() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/gems/rack.json")
            .with_status(503)
            .create_async()
            .await;

        let result = registry_for(&server).fetch_latest_version("rack").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::InvalidResponse(_))));
    }
}
