use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::parser::types::Ecosystem;
use crate::version::error::CacheError;

/// Write-through cache of resolved latest versions backed by a JSON document.
///
/// Keys are namespaced by ecosystem (`"npm:express"`). Reads are concurrent;
/// writes are serialized and rewrite the whole document before returning.
/// The document is written from a snapshot, so readers never wait on disk.
/// Entries do not expire.
pub struct VersionCache {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
    /// Held for a whole `set` so documents land in mutation order
    persist_lock: Mutex<()>,
}

impl VersionCache {
    /// Open the cache at `path`, creating its parent directory if needed.
    ///
    /// A missing or corrupt document starts an empty cache. Failing to
    /// prepare the location is returned since every later write would fail.
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        info!("Loading version cache from {:?}", path);

        if path.is_dir() {
            return Err(CacheError::Persist {
                path: path.display().to_string(),
                source: std::io::Error::new(ErrorKind::InvalidInput, "path is a directory"),
            });
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| CacheError::Persist {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let entries = match Self::load(path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Starting with an empty version cache: {}", e);
                BTreeMap::new()
            }
        };

        info!("Version cache loaded with {} entries", entries.len());

        Ok(Self {
            path: path.to_path_buf(),
            entries: RwLock::new(entries),
            persist_lock: Mutex::new(()),
        })
    }

    fn load(path: &Path) -> Result<BTreeMap<String, String>, CacheError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No cache file at {:?}", path);
                return Ok(BTreeMap::new());
            }
            Err(source) => {
                return Err(CacheError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        Ok(serde_json::from_str(&content)?)
    }

    /// Cache key for a package: `"<ecosystem>:<name>"`
    pub fn key(ecosystem: Ecosystem, package_name: &str) -> String {
        format!("{}:{}", ecosystem.as_str(), package_name)
    }

    fn read_entries(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, String>>, CacheError> {
        self.entries.read().map_err(|_| CacheError::LockPoisoned)
    }

    fn write_entries(
        &self,
    ) -> Result<RwLockWriteGuard<'_, BTreeMap<String, String>>, CacheError> {
        self.entries.write().map_err(|_| CacheError::LockPoisoned)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.read_entries()?.get(key).cloned())
    }

    pub fn len(&self) -> Result<usize, CacheError> {
        Ok(self.read_entries()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.read_entries()?.is_empty())
    }

    /// Store `version` under `key` and rewrite the backing document.
    ///
    /// The in-memory entry is kept even when persisting fails.
    pub fn set(&self, key: &str, version: &str) -> Result<(), CacheError> {
        let _persist = self
            .persist_lock
            .lock()
            .map_err(|_| CacheError::LockPoisoned)?;

        let snapshot = {
            let mut entries = self.write_entries()?;
            entries.insert(key.to_string(), version.to_string());
            entries.clone()
        };
        debug!("Cached {} = {}", key, version);

        self.persist(&snapshot)
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), CacheError> {
        let content = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");

        std::fs::write(&tmp_path, content)
            .and_then(|_| std::fs::rename(&tmp_path, &self.path))
            .map_err(|source| CacheError::Persist {
                path: self.path.display().to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn cache_in(dir: &TempDir) -> VersionCache {
        VersionCache::open(&dir.path().join("version_cache.json")).unwrap()
    }

    #[test]
    fn key_is_namespaced_by_ecosystem() {
        assert_eq!(VersionCache::key(Ecosystem::Node, "express"), "npm:express");
        assert_eq!(VersionCache::key(Ecosystem::Python, "express"), "pypi:express");
        assert_eq!(
            VersionCache::key(Ecosystem::Maven, "org.a:b"),
            "maven:org.a:b"
        );
    }

    #[test]
    fn open_starts_empty_without_file() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        assert!(cache.is_empty().unwrap());
        assert_eq!(cache.get("npm:express").unwrap(), None);
    }

    #[test]
    fn open_recovers_from_corrupt_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("version_cache.json");
        std::fs::write(&path, "{ not json").unwrap();

        let cache = VersionCache::open(&path).unwrap();

        assert!(cache.is_empty().unwrap());
    }

    #[test]
    fn open_creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/version_cache.json");

        let cache = VersionCache::open(&path).unwrap();
        cache.set("go:golang.org/x/text", "v0.14.0").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn open_rejects_directory_path() {
        let dir = TempDir::new().unwrap();
        let result = VersionCache::open(dir.path());
        assert!(matches!(result, Err(CacheError::Persist { .. })));
    }

    #[test]
    fn set_writes_through_to_document() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        cache.set("npm:express", "5.0.0").unwrap();

        let reopened = cache_in(&dir);
        assert_eq!(reopened.get("npm:express").unwrap(), Some("5.0.0".to_string()));
    }

    #[test]
    fn set_overwrites_existing_entry() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        cache.set("pypi:requests", "2.25.1").unwrap();
        cache.set("pypi:requests", "2.32.0").unwrap();

        assert_eq!(cache.get("pypi:requests").unwrap(), Some("2.32.0".to_string()));
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn set_keeps_memory_entry_when_persist_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache_dir/version_cache.json");
        let cache = VersionCache::open(&path).unwrap();
        std::fs::remove_dir_all(dir.path().join("cache_dir")).unwrap();

        let result = cache.set("gem:rails", "7.1.0");

        assert!(matches!(result, Err(CacheError::Persist { .. })));
        assert_eq!(cache.get("gem:rails").unwrap(), Some("7.1.0".to_string()));
    }

    #[test]
    fn concurrent_writers_all_land_in_document() {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(cache_in(&dir));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache.set(&format!("npm:pkg-{}", i), "1.0.0").unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let reopened = cache_in(&dir);
        assert_eq!(reopened.len().unwrap(), 16);
    }

    #[test]
    fn concurrent_overwrites_leave_document_matching_memory() {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(cache_in(&dir));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache.set("go:github.com/gin-gonic/gin", &format!("v1.{}.0", i)).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let reopened = cache_in(&dir);
        assert_eq!(
            reopened.get("go:github.com/gin-gonic/gin").unwrap(),
            cache.get("go:github.com/gin-gonic/gin").unwrap()
        );
    }

    #[test]
    fn readers_are_not_blocked_while_document_is_written() {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(cache_in(&dir));
        cache.set("npm:express", "5.0.0").unwrap();

        // Simulates a writer that is in the middle of persisting
        let _persisting = cache.persist_lock.lock().unwrap();

        let (tx, rx) = std::sync::mpsc::channel();
        let reader = Arc::clone(&cache);
        std::thread::spawn(move || {
            tx.send(reader.get("npm:express").unwrap()).unwrap();
        });

        let value = rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .unwrap();
        assert_eq!(value, Some("5.0.0".to_string()));
    }
}
