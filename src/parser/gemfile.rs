//! Gemfile.lock and Gemfile parsers
//!
//! Gemfile.lock is preferred: its `GEM` / `specs:` section lists the resolved
//! version of every gem. Gemfile is the fallback and only carries requirements.
//!
//! Format examples:
//! - Gemfile.lock spec: `    rails (6.1.4)` (four-space indent, nested deps use six)
//! - Gemfile: `gem "rails", "~> 6.1.4"`

use regex::Regex;

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::{DeclaredDependency, VERSION_COMPLEX, VERSION_NOT_SPECIFIED};

/// Parser for Gemfile.lock files
pub struct GemfileLockParser {
    /// Regex for a top-level spec: `    name (version)`
    spec_re: Regex,
}

impl GemfileLockParser {
    pub fn new() -> Self {
        Self {
            spec_re: Regex::new(r"^    ([^\s(]+) \(([^)]+)\)\s*$").unwrap(),
        }
    }
}

impl Default for GemfileLockParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for GemfileLockParser {
    fn file_name(&self) -> &'static str {
        "Gemfile.lock"
    }

    fn parse(&self, content: &str) -> Result<Vec<DeclaredDependency>, ParseError> {
        let mut results = Vec::new();
        let mut in_gem_section = false;

        for line in content.lines() {
            // Section headers (GEM, GIT, PATH, PLATFORMS, ...) start at column 0
            if !line.starts_with(' ') && !line.trim().is_empty() {
                in_gem_section = line.trim() == "GEM";
                continue;
            }

            if !in_gem_section {
                continue;
            }

            if let Some(caps) = self.spec_re.captures(line) {
                results.push(DeclaredDependency::new(&caps[1], &caps[2]));
            }
        }

        Ok(results)
    }
}

/// Parser for Gemfile files
pub struct GemfileParser {
    /// Regex for a gem declaration: `gem "name"[, args...]`
    gem_re: Regex,
}

impl GemfileParser {
    pub fn new() -> Self {
        Self {
            gem_re: Regex::new(r#"^\s*gem\s+["']([^"']+)["'](.*)$"#).unwrap(),
        }
    }

    /// Positional quoted arguments after the name are version requirements
    fn requirement(args: &str) -> String {
        let requirements: Vec<&str> = args
            .split(',')
            .map(str::trim)
            .filter(|arg| arg.starts_with('"') || arg.starts_with('\''))
            .map(|arg| arg.trim_matches(|c| c == '"' || c == '\''))
            .collect();

        match requirements.as_slice() {
            [] => VERSION_NOT_SPECIFIED.to_string(),
            [single] => single.to_string(),
            _ => VERSION_COMPLEX.to_string(),
        }
    }
}

impl Default for GemfileParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for GemfileParser {
    fn file_name(&self) -> &'static str {
        "Gemfile"
    }

    fn parse(&self, content: &str) -> Result<Vec<DeclaredDependency>, ParseError> {
        let results = content
            .lines()
            .filter(|line| !line.trim_start().starts_with('#'))
            .filter_map(|line| self.gem_re.captures(line))
            .map(|caps| {
                let args = caps[2].split('#').next().unwrap_or_default();
                DeclaredDependency::new(&caps[1], Self::requirement(args))
            })
            .collect();

        Ok(results)
    }
}
