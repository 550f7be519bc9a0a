//! package.json parser

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::DeclaredDependency;
use tracing::warn;

/// Parser for package.json files
///
/// Versions are the declared ranges (e.g., "^4.17.1"), not installed versions.
pub struct PackageJsonParser;

impl PackageJsonParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PackageJsonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for PackageJsonParser {
    fn file_name(&self) -> &'static str {
        "package.json"
    }

    fn parse(&self, content: &str) -> Result<Vec<DeclaredDependency>, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        let language = tree_sitter_json::LANGUAGE;
        parser.set_language(&language.into()).map_err(|e| {
            warn!("Failed to set JSON language for tree-sitter: {}", e);
            ParseError::TreeSitter(e.to_string())
        })?;

        let tree = parser.parse(content, None).ok_or_else(|| {
            warn!("Failed to parse JSON content");
            ParseError::ParseFailed("Failed to parse JSON".to_string())
        })?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(ParseError::InvalidSyntax(
                "package.json is not valid JSON".to_string(),
            ));
        }

        let mut results = Vec::new();

        if let Some(document) = root.child(0)
            && document.kind() == "object"
        {
            self.extract_dependencies(document, content, &mut results);
        }

        Ok(results)
    }
}

impl PackageJsonParser {
    /// Dependency field names to extract
    const DEPENDENCY_FIELDS: [&'static str; 4] = [
        "dependencies",
        "devDependencies",
        "peerDependencies",
        "optionalDependencies",
    ];

    /// Parse npm alias format: npm:package@version or npm:@scope/package@version
    /// Returns (actual_package_name, version)
    fn parse_npm_alias(value: &str) -> Option<(String, String)> {
        let rest = value.strip_prefix("npm:")?;

        if rest.starts_with('@') {
            // @scope/package@version: the version separator is the @ after the slash
            let slash_pos = rest.find('/')?;
            let after_slash = &rest[slash_pos + 1..];

            if let Some(at_pos) = after_slash.find('@') {
                let package_name = &rest[..slash_pos + 1 + at_pos];
                let version = &after_slash[at_pos + 1..];
                Some((package_name.to_string(), version.to_string()))
            } else {
                Some((rest.to_string(), "latest".to_string()))
            }
        } else if let Some(at_pos) = rest.find('@') {
            let package_name = &rest[..at_pos];
            let version = &rest[at_pos + 1..];
            Some((package_name.to_string(), version.to_string()))
        } else {
            Some((rest.to_string(), "latest".to_string()))
        }
    }

    /// Extract dependencies from the root object
    fn extract_dependencies(
        &self,
        object_node: tree_sitter::Node,
        content: &str,
        results: &mut Vec<DeclaredDependency>,
    ) {
        let mut cursor = object_node.walk();

        for child in object_node.children(&mut cursor) {
            if child.kind() != "pair" {
                continue;
            }

            let Some(key_node) = child.child_by_field_name("key") else {
                continue;
            };

            let key_text = self.get_string_value(key_node, content);

            if !Self::DEPENDENCY_FIELDS.contains(&key_text.as_str()) {
                continue;
            }

            let Some(value_node) = child.child_by_field_name("value") else {
                continue;
            };

            if value_node.kind() == "object" {
                self.extract_packages_from_object(value_node, content, results);
            } else {
                warn!("Ignoring non-object '{}' section in package.json", key_text);
            }
        }
    }

    /// Extract packages from a dependency object (e.g., "dependencies": { ... })
    fn extract_packages_from_object(
        &self,
        object_node: tree_sitter::Node,
        content: &str,
        results: &mut Vec<DeclaredDependency>,
    ) {
        let mut cursor = object_node.walk();

        for child in object_node.children(&mut cursor) {
            if child.kind() != "pair" {
                continue;
            }

            let Some(key_node) = child.child_by_field_name("key") else {
                continue;
            };

            let Some(value_node) = child.child_by_field_name("value") else {
                continue;
            };

            if value_node.kind() != "string" {
                continue;
            }

            let key_name = self.get_string_value(key_node, content);
            let raw_version = self.get_string_value(value_node, content);

            let (package_name, version) = Self::parse_npm_alias(&raw_version)
                .unwrap_or((key_name, raw_version));

            results.push(DeclaredDependency::new(package_name, version));
        }
    }

    /// Get the string value from a string node (removes quotes)
    fn get_string_value(&self, node: tree_sitter::Node, content: &str) -> String {
        let text = &content[node.byte_range()];
        text.trim()
            .trim_start_matches('"')
            .trim_end_matches('"')
            .to_string()
    }
}
