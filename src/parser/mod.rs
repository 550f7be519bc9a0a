//! Parser layer
//! - traits.rs: Parser trait definition
//! - types.rs: Common types (Ecosystem, DeclaredDependency)
//! - package_lock.rs / package_json.rs: Node.js manifests
//! - requirements_txt.rs: Python requirements
//! - gemfile.rs: Gemfile.lock / Gemfile
//! - pom_xml.rs: Maven pom.xml
//! - go_mod.rs: go.mod parser

pub mod gemfile;
pub mod go_mod;
pub mod package_json;
pub mod package_lock;
pub mod pom_xml;
pub mod requirements_txt;
pub mod traits;
pub mod types;

use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, warn};

pub use gemfile::{GemfileLockParser, GemfileParser};
pub use go_mod::GoModParser;
pub use package_json::PackageJsonParser;
pub use package_lock::PackageLockParser;
pub use pom_xml::PomXmlParser;
pub use requirements_txt::RequirementsTxtParser;
pub use traits::{ParseError, Parser, into_dependency_map};
pub use types::{DeclaredDependency, Ecosystem};

/// Dependencies read from one manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDependencies {
    /// File the dependencies were read from
    pub source: &'static str,
    /// Package name -> declared version, in manifest order
    pub dependencies: IndexMap<String, String>,
}

/// Parsers for an ecosystem, most accurate manifest first
pub fn parsers_for(ecosystem: Ecosystem) -> Vec<Box<dyn Parser>> {
    match ecosystem {
        Ecosystem::Node => vec![
            Box::new(PackageLockParser::new()),
            Box::new(PackageJsonParser::new()),
        ],
        Ecosystem::Python => vec![Box::new(RequirementsTxtParser::new())],
        Ecosystem::Ruby => vec![
            Box::new(GemfileLockParser::new()),
            Box::new(GemfileParser::new()),
        ],
        Ecosystem::Maven => vec![Box::new(PomXmlParser::new())],
        Ecosystem::Go => vec![Box::new(GoModParser::new())],
    }
}

/// Locate and parse the manifest for `ecosystem` in `directory`.
///
/// Returns `Ok(None)` when no manifest exists. When a preferred manifest
/// fails to parse or declares nothing, the next one is tried; the error of
/// the last candidate is returned if none succeeds.
pub fn load_dependencies(
    ecosystem: Ecosystem,
    directory: &Path,
) -> Result<Option<ManifestDependencies>, ParseError> {
    let candidates: Vec<_> = parsers_for(ecosystem)
        .into_iter()
        .map(|parser| {
            let path = directory.join(parser.file_name());
            (parser, path)
        })
        .filter(|(_, path)| path.is_file())
        .collect();

    let Some(last_index) = candidates.len().checked_sub(1) else {
        debug!(
            "No {} manifest found in {}",
            ecosystem,
            directory.display()
        );
        return Ok(None);
    };

    for (index, (parser, path)) in candidates.iter().enumerate() {
        let is_last = index == last_index;

        let parsed = std::fs::read_to_string(path)
            .map_err(|source| ParseError::Io {
                path: path.display().to_string(),
                source,
            })
            .and_then(|content| parser.parse(&content));

        match parsed {
            Ok(deps) if !deps.is_empty() || is_last => {
                debug!("Parsed {} dependencies from {}", deps.len(), path.display());
                return Ok(Some(ManifestDependencies {
                    source: parser.file_name(),
                    dependencies: into_dependency_map(deps),
                }));
            }
            Ok(_) => {
                debug!(
                    "{} declares no dependencies, trying next manifest",
                    path.display()
                );
            }
            Err(e) if !is_last => {
                warn!(
                    "Failed to parse {}, falling back to next manifest: {}",
                    path.display(),
                    e
                );
            }
            Err(e) => return Err(e),
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_dependencies_returns_none_without_manifest() {
        let dir = TempDir::new().unwrap();
        let result = load_dependencies(Ecosystem::Go, dir.path()).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn load_dependencies_prefers_lockfile() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{ "dependencies": { "express": "^4.17.1" } }"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("package-lock.json"),
            r#"{ "packages": { "node_modules/express": { "version": "4.17.1" } } }"#,
        )
        .unwrap();

        let result = load_dependencies(Ecosystem::Node, dir.path())
            .unwrap()
            .unwrap();

        assert_eq!(result.source, "package-lock.json");
        assert_eq!(result.dependencies.get("express"), Some(&"4.17.1".to_string()));
    }

    #[test]
    fn load_dependencies_falls_back_when_lockfile_is_corrupt() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{ "dependencies": { "express": "^4.17.1" } }"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("package-lock.json"), "{ broken").unwrap();

        let result = load_dependencies(Ecosystem::Node, dir.path())
            .unwrap()
            .unwrap();

        assert_eq!(result.source, "package.json");
        assert_eq!(result.dependencies.get("express"), Some(&"^4.17.1".to_string()));
    }

    #[test]
    fn load_dependencies_returns_error_when_only_manifest_is_corrupt() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("pom.xml"), "<project><dependencies></project>").unwrap();

        let result = load_dependencies(Ecosystem::Maven, dir.path());

        assert!(matches!(result, Err(ParseError::InvalidSyntax(_))));
    }

    #[test]
    fn load_dependencies_returns_empty_map_for_manifest_without_dependencies() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("go.mod"), "module example.com/empty\n").unwrap();

        let result = load_dependencies(Ecosystem::Go, dir.path())
            .unwrap()
            .unwrap();

        assert!(result.dependencies.is_empty());
    }
}
