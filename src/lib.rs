//! Dependency inventory and report generation
//!
//! Reads project manifests for Node.js, Python, Ruby, Maven and Go, looks up
//! the latest published version and known vulnerabilities of every declared
//! dependency, and writes a Markdown report.
//!
//! # Modules
//!
//! - [`config`]: Configuration file model and data directory paths
//! - [`generator`]: Report generation facade
//! - [`logging`]: Tracing subscriber setup
//! - [`parser`]: Manifest parsers
//! - [`report`]: Markdown report writer
//! - [`version`]: Version cache, registry clients, vulnerability lookups and
//!   the resolution pipeline

pub mod config;
pub mod generator;
pub mod logging;
pub mod parser;
pub mod report;
pub mod version;
