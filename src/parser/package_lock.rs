//! package-lock.json parser
//!
//! Lockfiles carry the installed (exact) versions, so they are preferred over
//! package.json when both exist.
//!
//! - v2/v3: top-level `packages` map keyed by `node_modules/<name>`
//! - v1: top-level `dependencies` map keyed by package name

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::DeclaredDependency;

const NODE_MODULES: &str = "node_modules/";

#[derive(Debug, Deserialize)]
struct Lockfile {
    #[serde(default)]
    packages: Option<IndexMap<String, LockedPackage>>,
    #[serde(default)]
    dependencies: Option<IndexMap<String, LockedPackage>>,
}

#[derive(Debug, Deserialize)]
struct LockedPackage {
    version: Option<String>,
}

/// Parser for package-lock.json files
pub struct PackageLockParser;

impl PackageLockParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PackageLockParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for PackageLockParser {
    fn file_name(&self) -> &'static str {
        "package-lock.json"
    }

    fn parse(&self, content: &str) -> Result<Vec<DeclaredDependency>, ParseError> {
        let lockfile: Lockfile = serde_json::from_str(content)
            .map_err(|e| ParseError::InvalidSyntax(format!("package-lock.json: {}", e)))?;

        if let Some(packages) = lockfile.packages {
            let results: Vec<_> = packages
                .into_iter()
                .filter_map(|(path, package)| {
                    // Only direct node_modules entries; nested ones are transitive copies
                    let name = path.strip_prefix(NODE_MODULES)?;
                    if name.contains(NODE_MODULES) {
                        return None;
                    }
                    Some(DeclaredDependency::new(name, package.version?))
                })
                .collect();
            debug!("Parsed {} packages from lockfile packages map", results.len());
            return Ok(results);
        }

        let results: Vec<_> = lockfile
            .dependencies
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(name, package)| Some(DeclaredDependency::new(name, package.version?)))
            .collect();
        debug!(
            "Parsed {} packages from lockfile dependencies map",
            results.len()
        );
        Ok(results)
    }
}
