//! Version lookup layer
//!
//! Resolves the latest published version and known vulnerabilities for
//! declared dependencies across npm, PyPI, RubyGems, Maven Central and the
//! Go module proxy.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────────┐
//! │   Pipeline  │────▶│    Cache    │     │  Vulnerability   │
//! │ (fan-out)   │     │   (JSON)    │     │  (VulnCheck)     │
//! └─────────────┘     └─────────────┘     └──────────────────┘
//!        │                                         ▲
//!        ▼                                         │
//! ┌─────────────┐                                  │
//! │  Registries │──────────── pinned versions ─────┘
//! │ (npm, pypi) │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: Write-through JSON version cache
//! - [`pipeline`]: Bounded concurrent resolution of a manifest
//! - [`registry`]: Registry trait for fetching the latest version
//! - [`registries`]: Concrete registry implementations
//! - [`resolver`]: Ecosystem -> registry factory
//! - [`vulnerability`]: PURL construction and VulnCheck lookups
//! - [`pinning`]: Pinned version detection
//! - [`error`]: Error types for cache and registry operations
//! - [`types`]: Result model and sentinel values

pub mod cache;
pub mod error;
pub mod pinning;
pub mod pipeline;
pub mod registries;
pub mod registry;
pub mod resolver;
pub mod types;
pub mod vulnerability;
