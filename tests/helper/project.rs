//! Temporary project directories with manifests

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary workspace holding project directories, a cache and a report
pub struct TestProject {
    root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Write `content` to `relative` (creating parent directories) and
    /// return the directory containing it
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(relative);
        let parent = path.parent().unwrap().to_path_buf();
        std::fs::create_dir_all(&parent).unwrap();
        std::fs::write(&path, content).unwrap();
        parent
    }

    pub fn cache_path(&self) -> PathBuf {
        self.root.path().join("data/version_cache.json")
    }

    pub fn report_path(&self) -> PathBuf {
        self.root.path().join("out/report.md")
    }
}
