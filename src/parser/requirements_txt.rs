//! requirements.txt parser for Python dependencies (PEP 508)
//!
//! Names are kept as written. Exact pins (`name==1.2.3`) yield the bare
//! version; any other specifier is kept verbatim. Option lines (`-r`, `-e`,
//! `--index-url`) and URL requirements are skipped as they don't resolve
//! against PyPI.

use std::str::FromStr;

use pep508_rs::{Requirement, VerbatimUrl, VersionOrUrl};
use tracing::warn;

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::{DeclaredDependency, VERSION_NOT_SPECIFIED};

/// Parser for requirements.txt files
pub struct RequirementsTxtParser;

impl RequirementsTxtParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a single requirement line.
    ///
    /// `pep508_rs` validates the line; the name and specifier are taken from
    /// the source text so the report shows what the manifest declares.
    fn parse_line(line: &str) -> Option<DeclaredDependency> {
        let req = Requirement::<VerbatimUrl>::from_str(line)
            .inspect_err(|e| warn!("Failed to parse requirement '{}': {}", line, e))
            .ok()?;

        if matches!(req.version_or_url, Some(VersionOrUrl::Url(_))) {
            return None;
        }

        let (name, rest) = split_name(line);
        let specifier = specifier_text(rest);

        let version = if specifier.is_empty() {
            VERSION_NOT_SPECIFIED.to_string()
        } else {
            exact_pin(specifier).unwrap_or(specifier).to_string()
        };

        Some(DeclaredDependency::new(name, version))
    }
}

/// Split the project name from the remainder of a requirement line
fn split_name(line: &str) -> (&str, &str) {
    let end = line
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        .unwrap_or(line.len());
    line.split_at(end)
}

/// Version specifier as written: extras, markers and parentheses removed
fn specifier_text(rest: &str) -> &str {
    let rest = rest.split(';').next().unwrap_or_default().trim();
    let rest = match rest.strip_prefix('[') {
        Some(extras) => extras.split_once(']').map_or("", |(_, tail)| tail.trim()),
        None => rest,
    };

    rest.strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(rest)
        .trim()
}

/// Bare version of a single `==` clause without wildcards
fn exact_pin(specifier: &str) -> Option<&str> {
    if specifier.contains(',') {
        return None;
    }

    let pinned = specifier.strip_prefix("==")?;
    if pinned.starts_with('=') || pinned.contains('*') {
        return None;
    }

    Some(pinned.trim())
}

impl Default for RequirementsTxtParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for RequirementsTxtParser {
    fn file_name(&self) -> &'static str {
        "requirements.txt"
    }

    fn parse(&self, content: &str) -> Result<Vec<DeclaredDependency>, ParseError> {
        let results = content
            .lines()
            .map(|line| match line.find(" #") {
                Some(pos) => &line[..pos],
                None => line,
            })
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
            .filter_map(Self::parse_line)
            .collect();

        Ok(results)
    }
}
