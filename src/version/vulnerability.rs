//! Vulnerability lookups against the VulnCheck PURL endpoint

use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::parser::types::Ecosystem;
use crate::version::error::RegistryError;
use crate::version::pinning::is_pinned_version;
use crate::version::registries::maven::split_coordinate;
use crate::version::types::VulnerabilityStatus;

/// Default VulnCheck PURL endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.vulncheck.com/v3/purl";

/// Build a Package-URL (`pkg:<type>/<namespace/name>@<version>`)
///
/// npm scopes have their leading `@` percent-encoded; Maven coordinates
/// become `groupId/artifactId`.
pub fn package_url(
    ecosystem: Ecosystem,
    package_name: &str,
    version: &str,
) -> Result<String, RegistryError> {
    let path = match ecosystem {
        Ecosystem::Node => match package_name.strip_prefix('@') {
            Some(scoped) => format!("%40{}", scoped),
            None => package_name.to_string(),
        },
        Ecosystem::Maven => {
            let (group_id, artifact_id) = split_coordinate(package_name)?;
            format!("{}/{}", group_id, artifact_id)
        }
        Ecosystem::Python | Ecosystem::Ruby | Ecosystem::Go => package_name.to_string(),
    };

    Ok(format!("pkg:{}/{}@{}", ecosystem.purl_type(), path, version))
}

#[derive(Debug, Deserialize)]
struct VulnerabilityRecord {
    id: Option<String>,
}

/// VulnCheck answers with either a bare list or a `{"data": [...]}` wrapper
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VulnerabilityResponse {
    List(Vec<VulnerabilityRecord>),
    Wrapped { data: Vec<VulnerabilityRecord> },
}

impl VulnerabilityResponse {
    fn into_ids(self) -> Vec<String> {
        let records = match self {
            VulnerabilityResponse::List(records) => records,
            VulnerabilityResponse::Wrapped { data } => data,
        };
        records.into_iter().filter_map(|record| record.id).collect()
    }
}

/// Client for the vulnerability-intelligence API
pub struct VulnerabilityChecker {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl VulnerabilityChecker {
    pub fn new(endpoint: &str, token: Option<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Look up known vulnerabilities for one pinned package version.
    ///
    /// Never fails: every outcome, including transport errors, is a
    /// `VulnerabilityStatus`. Unpinned versions and a missing token are
    /// short-circuited before any request.
    pub async fn fetch(
        &self,
        ecosystem: Ecosystem,
        package_name: &str,
        version: &str,
    ) -> VulnerabilityStatus {
        if !is_pinned_version(version) {
            debug!(
                "Skipping vulnerability check for {}@{}: version not pinned",
                package_name, version
            );
            return VulnerabilityStatus::VersionRange;
        }

        let Some(token) = self.token.as_deref() else {
            debug!("Skipping vulnerability check: VulnCheck token not available");
            return VulnerabilityStatus::NoToken;
        };

        let purl = match package_url(ecosystem, package_name, version) {
            Ok(purl) => purl,
            Err(e) => {
                warn!("Cannot build package URL for {}: {}", package_name, e);
                return VulnerabilityStatus::Processing;
            }
        };

        let url = match Url::parse_with_params(&self.endpoint, &[("purl", purl.as_str())]) {
            Ok(url) => url,
            Err(e) => {
                error!("Invalid vulnerability endpoint {}: {}", self.endpoint, e);
                return VulnerabilityStatus::Api;
            }
        };

        debug!("Fetching vulnerabilities for {}", purl);

        let response = match self.client.get(url).bearer_auth(token).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                error!("Timeout fetching vulnerabilities for {}", purl);
                return VulnerabilityStatus::Timeout;
            }
            Err(e) => {
                error!("Network error fetching vulnerabilities for {}: {}", purl, e);
                return VulnerabilityStatus::Network;
            }
        };

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                error!("VulnCheck rejected the API token (401)");
                return VulnerabilityStatus::Unauthorized;
            }
            StatusCode::FORBIDDEN => {
                error!("VulnCheck denied access (403)");
                return VulnerabilityStatus::Forbidden;
            }
            StatusCode::NOT_FOUND => {
                debug!("No vulnerability data for {} (404)", purl);
                return VulnerabilityStatus::Checked(Vec::new());
            }
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("VulnCheck rate limit exceeded for {}", purl);
                return VulnerabilityStatus::RateLimited;
            }
            status if !status.is_success() => {
                error!("VulnCheck returned status {} for {}", status, purl);
                return VulnerabilityStatus::Api;
            }
            _ => {}
        }

        match response.json::<VulnerabilityResponse>().await {
            Ok(body) => {
                let ids = body.into_ids();
                debug!("Found {} vulnerabilities for {}", ids.len(), purl);
                VulnerabilityStatus::Checked(ids)
            }
            Err(e) if e.is_timeout() => {
                error!("Timeout reading vulnerabilities for {}", purl);
                VulnerabilityStatus::Timeout
            }
            Err(e) => {
                error!("Failed to parse VulnCheck response for {}: {}", purl, e);
                VulnerabilityStatus::Parse
            }
        }
    }
}
