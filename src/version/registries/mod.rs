//! Registry implementations for fetching latest package versions

pub mod go_proxy;
pub mod maven;
pub mod npm;
pub mod pypi;
pub mod rubygems;

pub use go_proxy::GoProxyRegistry;
pub use maven::MavenCentralRegistry;
pub use npm::NpmRegistry;
pub use pypi::PypiRegistry;
pub use rubygems::RubyGemsRegistry;

use std::time::Duration;

use reqwest::StatusCode;
use tracing::warn;

use crate::version::error::RegistryError;

/// User agent sent with every registry request
pub const USER_AGENT: &str = concat!("dependency-report/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by all registry and vulnerability lookups
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// Substitute `{name}` placeholders in a URL template
pub fn render_url(template: &str, params: &[(&str, &str)]) -> String {
    params
        .iter()
        .fold(template.to_string(), |url, (name, value)| {
            url.replace(&format!("{{{}}}", name), value)
        })
}

/// Map non-success registry statuses onto the error taxonomy.
///
/// 404 and 410 both mean the registry has no such package.
pub(crate) fn check_status(
    response: &reqwest::Response,
    package_name: &str,
    registry: &str,
) -> Result<(), RegistryError> {
    let status = response.status();

    if status.is_success() {
        return Ok(());
    }

    match status {
        StatusCode::NOT_FOUND | StatusCode::GONE => {
            Err(RegistryError::NotFound(package_name.to_string()))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            Err(RegistryError::RateLimited {
                retry_after_secs: retry_after,
            })
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(RegistryError::Unauthorized(status.as_u16()))
        }
        _ => {
            warn!("{} returned status {}: {}", registry, status, response.url());
            Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )))
        }
    }
}
