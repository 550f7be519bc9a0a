//! Maven Central search API implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::parser::types::Ecosystem;
use crate::version::error::RegistryError;
use crate::version::registries::{check_status, render_url};
use crate::version::registry::Registry;

/// Default URL template for the Maven Central Solr search endpoint
pub const DEFAULT_URL_TEMPLATE: &str =
    "https://search.maven.org/solrsearch/select?q=g:{group_id}+AND+a:{artifact_id}&wt=json";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchResult,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    /// Version in gav-core results, latest version in artifact results
    #[serde(alias = "latestVersion")]
    v: Option<String>,
    #[serde(default)]
    timestamp: Option<i64>,
}

/// Split a `groupId:artifactId` coordinate
pub fn split_coordinate(package_name: &str) -> Result<(&str, &str), RegistryError> {
    let mut parts = package_name.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(group_id), Some(artifact_id), None)
            if !group_id.is_empty() && !artifact_id.is_empty() =>
        {
            Ok((group_id, artifact_id))
        }
        _ => Err(RegistryError::InvalidIdentifier(package_name.to_string())),
    }
}

/// Maven Central registry client
pub struct MavenCentralRegistry {
    client: Client,
    url_template: String,
}

impl MavenCentralRegistry {
    pub fn new(url_template: &str, client: Client) -> Self {
        Self {
            client,
            url_template: url_template.to_string(),
        }
    }
}

impl Default for MavenCentralRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_URL_TEMPLATE, Client::new())
    }
}

/// Pick the most recently published document; the first wins on ties.
fn latest_doc(docs: &[SearchDoc]) -> Option<&SearchDoc> {
    docs.iter()
        .enumerate()
        .filter_map(|(i, doc)| doc.timestamp.map(|ts| (ts, i, doc)))
        .fold(None, |best: Option<(i64, usize, &SearchDoc)>, candidate| match best {
            Some(current) if current.0 >= candidate.0 => Some(current),
            _ => Some(candidate),
        })
        .map(|(_, _, doc)| doc)
        .or_else(|| docs.first())
}

#[async_trait]
impl Registry for MavenCentralRegistry {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Maven
    }

    async fn fetch_latest_version(&self, package_name: &str) -> Result<String, RegistryError> {
        let (group_id, artifact_id) = split_coordinate(package_name)?;
        let url = render_url(
            &self.url_template,
            &[("group_id", group_id), ("artifact_id", artifact_id)],
        );
        debug!("Searching Maven Central: {}", url);

        let response = self.client.get(&url).send().await?;
        check_status(&response, package_name, "Maven Central")?;

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::InvalidResponse(e.to_string()))?;

        let doc = latest_doc(&search.response.docs)
            .ok_or_else(|| RegistryError::NotFound(package_name.to_string()))?;

        doc.v.clone().ok_or_else(|| {
            RegistryError::InvalidResponse(format!("No version in search result for {}", package_name))
        })
    }
}
