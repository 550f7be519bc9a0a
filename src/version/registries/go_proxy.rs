//! Go proxy registry API implementation

use crate::parser::types::Ecosystem;
use crate::version::error::RegistryError;
use crate::version::registries::{check_status, render_url};
use crate::version::registry::Registry;
use tracing::{debug, warn};

/// Default URL template for the Go module proxy version list
pub const DEFAULT_URL_TEMPLATE: &str = "https://proxy.golang.org/{package}/@v/list";

/// Registry implementation for Go proxy API
pub struct GoProxyRegistry {
    client: reqwest::Client,
    url_template: String,
}

impl GoProxyRegistry {
    /// Creates a new GoProxyRegistry with a custom URL template
    pub fn new(url_template: &str, client: reqwest::Client) -> Self {
        Self {
            client,
            url_template: url_template.to_string(),
        }
    }
}

impl Default for GoProxyRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_URL_TEMPLATE, reqwest::Client::new())
    }
}

#[async_trait::async_trait]
impl Registry for GoProxyRegistry {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Go
    }

    async fn fetch_latest_version(&self, package_name: &str) -> Result<String, RegistryError> {
        // Go proxy expects module path to be URL-encoded, with uppercase letters
        // escaped as !{lowercase}. For example: github.com/Azure -> github.com/!azure
        let encoded_module = encode_module_path(package_name);
        let url = render_url(&self.url_template, &[("package", &encoded_module)]);
        debug!("Fetching Go module versions: {}", url);

        let response = self.client.get(&url).send().await?;
        check_status(&response, package_name, "Go proxy")?;

        let body = response.text().await.map_err(|e| {
            warn!("Failed to read Go proxy response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        // The list carries one version per line; the proxy's last entry is
        // reported as latest without re-sorting.
        body.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .next_back()
            .map(str::to_string)
            .ok_or_else(|| RegistryError::NotFound(package_name.to_string()))
    }
}

/// Encodes a Go module path for use in proxy URLs.
/// Uppercase letters are escaped as !{lowercase}.
fn encode_module_path(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    for c in path.chars() {
        if c.is_ascii_uppercase() {
            result.push('!');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}
