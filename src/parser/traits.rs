//! Parser trait definition

use indexmap::IndexMap;

use crate::parser::types::DeclaredDependency;

/// Trait for parsing dependency manifests
pub trait Parser: Send + Sync {
    /// File name this parser reads (e.g., "package.json")
    fn file_name(&self) -> &'static str;

    /// Parse the content and extract the declared dependencies
    fn parse(&self, content: &str) -> Result<Vec<DeclaredDependency>, ParseError>;
}

/// Error type for parsing operations
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to read the manifest from disk
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the file structure
    #[error("Failed to parse file: {0}")]
    ParseFailed(String),

    /// Invalid syntax in the file
    #[error("Invalid syntax: {0}")]
    InvalidSyntax(String),

    /// Tree-sitter related error
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),
}

/// Collapse parsed dependencies into a name -> declared version map.
///
/// Keeps first-seen order; a later duplicate replaces the version in place.
pub fn into_dependency_map(deps: Vec<DeclaredDependency>) -> IndexMap<String, String> {
    let mut map = IndexMap::with_capacity(deps.len());
    for dep in deps {
        map.insert(dep.name, dep.declared_version);
    }
    map
}
