//! Common types for parsers

use std::fmt;

/// Package ecosystem a manifest belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ecosystem {
    /// npm registry (package-lock.json / package.json)
    Node,
    /// PyPI (requirements.txt)
    Python,
    /// RubyGems (Gemfile.lock / Gemfile)
    Ruby,
    /// Maven Central (pom.xml)
    Maven,
    /// Go module proxy (go.mod)
    Go,
}

impl Ecosystem {
    pub const ALL: [Ecosystem; 5] = [
        Ecosystem::Node,
        Ecosystem::Python,
        Ecosystem::Ruby,
        Ecosystem::Maven,
        Ecosystem::Go,
    ];

    /// Returns the short identifier used for cache keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::Node => "npm",
            Ecosystem::Python => "pypi",
            Ecosystem::Ruby => "rubygems",
            Ecosystem::Maven => "maven",
            Ecosystem::Go => "go",
        }
    }

    /// Returns the environment name used in configuration files and reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Ecosystem::Node => "Node.js",
            Ecosystem::Python => "Python",
            Ecosystem::Ruby => "Ruby",
            Ecosystem::Maven => "Maven",
            Ecosystem::Go => "Go",
        }
    }

    /// Returns the Package-URL type for this ecosystem
    pub fn purl_type(&self) -> &'static str {
        match self {
            Ecosystem::Node => "npm",
            Ecosystem::Python => "pypi",
            Ecosystem::Ruby => "gem",
            Ecosystem::Maven => "maven",
            Ecosystem::Go => "golang",
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Ecosystem {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Node.js" | "npm" => Ok(Ecosystem::Node),
            "Python" | "pypi" => Ok(Ecosystem::Python),
            "Ruby" | "rubygems" => Ok(Ecosystem::Ruby),
            "Maven" | "maven" => Ok(Ecosystem::Maven),
            "Go" | "go" => Ok(Ecosystem::Go),
            _ => Err(()),
        }
    }
}

/// Declared version used when a manifest names a package without a version
pub const VERSION_UNKNOWN: &str = "unknown";

/// Declared version used when a requirement line carries no specifier
pub const VERSION_NOT_SPECIFIED: &str = "Not specified";

/// Declared version used when a requirement combines several constraints
pub const VERSION_COMPLEX: &str = "(Complex Specifier)";

/// A dependency as declared in a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    /// Ecosystem-scoped identifier (e.g., "express", "org.slf4j:slf4j-api")
    pub name: String,
    /// Version text as written in the manifest (exact, range or placeholder)
    pub declared_version: String,
}

impl DeclaredDependency {
    pub fn new(name: impl Into<String>, declared_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_version: declared_version.into(),
        }
    }
}
