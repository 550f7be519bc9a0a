//! Report layer
//! - markdown.rs: Markdown rendering of sections, header and footer
//!
//! [`ReportWriter`] owns the output file: the header truncates it, every
//! later write appends.

pub mod markdown;

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::debug;

use crate::parser::types::Ecosystem;
use crate::version::types::LookupResult;

pub use markdown::format_section;

/// Incrementally written Markdown report
pub struct ReportWriter {
    path: PathBuf,
}

impl ReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create (or truncate) the report and write its header
    pub fn initialize(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        debug!("Initializing report at {:?}", self.path);
        std::fs::write(&self.path, markdown::header(Local::now()))
    }

    /// Append the section for one ecosystem in one directory
    pub fn append_section(
        &self,
        ecosystem: Ecosystem,
        directory: &str,
        results: &[LookupResult],
    ) -> std::io::Result<()> {
        self.append(&format_section(ecosystem, directory, results))
    }

    pub fn append_error(&self, message: &str) -> std::io::Result<()> {
        self.append(&markdown::error_section(message))
    }

    /// Write the legend footer
    pub fn finalize(&self) -> std::io::Result<()> {
        self.append(&markdown::footer())
    }

    fn append(&self, content: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(content.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writer_produces_header_sections_and_footer_in_order() {
        let dir = TempDir::new().unwrap();
        let writer = ReportWriter::new(dir.path().join("out/report.md"));

        writer.initialize().unwrap();
        writer.append_section(Ecosystem::Ruby, "./app", &[]).unwrap();
        writer.append_error("Directory not found: ./gone").unwrap();
        writer.finalize().unwrap();

        let content = std::fs::read_to_string(writer.path()).unwrap();
        let header = content.find("# Dependency Analysis Report").unwrap();
        let section = content.find("## Ruby Dependencies in ./app").unwrap();
        let error = content.find("## Error").unwrap();
        let footer = content.find("## Report Summary").unwrap();
        assert!(header < section && section < error && error < footer);
        assert!(content.ends_with("Report complete.\n"));
    }

    #[test]
    fn initialize_truncates_previous_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.md");
        std::fs::write(&path, "stale content").unwrap();

        ReportWriter::new(&path).initialize().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale content"));
    }

    #[test]
    fn append_fails_before_initialize() {
        let dir = TempDir::new().unwrap();
        let writer = ReportWriter::new(dir.path().join("never-created.md"));

        assert!(writer.append_error("x").is_err());
    }
}
