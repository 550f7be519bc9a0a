//! go.mod parser
//!
//! Parses go.mod files to extract module dependencies.
//! Supports both single-line require directives and require blocks.
//!
//! Format examples:
//! - Single: `require golang.org/x/text v0.14.0`
//! - Block:
//!   ```text
//!   require (
//!       golang.org/x/text v0.14.0
//!       golang.org/x/net v0.20.0 // indirect
//!   )
//!   ```

use regex::Regex;

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::DeclaredDependency;

/// Parser for go.mod files
pub struct GoModParser {
    /// Regex for single-line require: `require module/path v1.2.3`
    single_require_re: Regex,
    /// Regex for require block start: `require (`
    block_start_re: Regex,
    /// Regex for require spec inside block: `module/path v1.2.3`
    require_spec_re: Regex,
}

impl GoModParser {
    pub fn new() -> Self {
        Self {
            // Match: require module/path v1.2.3 [// comment]
            single_require_re: Regex::new(r"^require\s+(\S+)\s+(v[^\s]+)(?:\s*//.*)?$").unwrap(),
            // Match: require (
            block_start_re: Regex::new(r"^require\s*\(\s*$").unwrap(),
            // Match: module/path v1.2.3 [// comment]
            require_spec_re: Regex::new(r"^\s*(\S+)\s+(v[^\s]+)(?:\s*//.*)?$").unwrap(),
        }
    }
}

impl Default for GoModParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for GoModParser {
    fn file_name(&self) -> &'static str {
        "go.mod"
    }

    fn parse(&self, content: &str) -> Result<Vec<DeclaredDependency>, ParseError> {
        let mut results = Vec::new();
        let mut in_require_block = false;

        for line in content.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }

            if in_require_block && trimmed == ")" {
                in_require_block = false;
                continue;
            }

            if self.block_start_re.is_match(trimmed) {
                in_require_block = true;
                continue;
            }

            let caps = if in_require_block {
                self.require_spec_re.captures(trimmed)
            } else {
                self.single_require_re.captures(trimmed)
            };

            if let Some(caps) = caps {
                results.push(DeclaredDependency::new(&caps[1], &caps[2]));
            }
        }

        Ok(results)
    }
}
