//! Cache manager for document-level memoization.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use tokenlint_ast::Document;
use tokenlint_rule::LintResult;

use crate::{CacheEntry, CacheError, apply_fixes};

/// Default store location, relative to the working directory.
pub const DEFAULT_CACHE_LOCATION: &str = ".tokenlint-cache.json";

/// Manages cached lint results for one invocation.
///
/// The store is shared across worker threads. Each document id is handled
/// by exactly one task, and the lock is only held for lookups and stores.
pub struct CacheManager {
    /// JSON file backing the store.
    path: PathBuf,
    entries: Mutex<HashMap<String, CacheEntry>>,
    /// Whether lookups and stores are performed.
    enabled: bool,
    /// Whether fixes are written back to documents.
    fix: bool,
}

impl CacheManager {
    /// Creates an empty, enabled cache backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(HashMap::new()),
            enabled: true,
            fix: false,
        }
    }

    /// Opens the store at `path`.
    ///
    /// A missing or corrupted store yields an empty cache; the latter is
    /// logged, never returned.
    pub fn open(path: impl Into<PathBuf>, enabled: bool) -> Self {
        let mut cache = Self::new(path).with_enabled(enabled);
        if let Err(e) = cache.load() {
            warn!("Ignoring cache at {}: {}", cache.path.display(), e);
            cache.entries.get_mut().clear();
        }
        cache
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Enables writing fixes back to documents.
    pub fn with_fix(mut self, fix: bool) -> Self {
        self.fix = fix;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the result for `document`, linting it only when needed.
    ///
    /// A stored entry whose stat matches the document is returned as is and
    /// `lint` is not called. Otherwise the text is read and linted. In fix
    /// mode, fixes are applied and written back, and the fixed text is
    /// linted once more so the stored result describes what is on disk.
    pub fn process_document<F>(
        &self,
        document: &dyn Document,
        lint: F,
    ) -> Result<LintResult, CacheError>
    where
        F: Fn(&str) -> LintResult,
    {
        let id = document.id();
        let stat = if self.enabled {
            match document.stat() {
                Ok(stat) => Some(stat),
                Err(e) => {
                    debug!("Cannot stat {}: {}", id, e);
                    None
                }
            }
        } else {
            None
        };

        if let Some(stat) = &stat
            && let Some(entry) = self.entries.lock().get(id)
            && entry.is_fresh(stat)
        {
            debug!("Cache hit: {}", id);
            return Ok(entry.result.clone());
        }

        debug!("Cache miss: {}", id);
        let text = document.text().map_err(|e| CacheError::read(id, e))?;
        let mut result = lint(&text);

        if self.fix && result.fixable_count() > 0 {
            let fixed = apply_fixes(&text, &result.messages);
            if fixed.modified {
                document
                    .write_text(&fixed.fixed_content)
                    .map_err(|e| CacheError::write(id, e))?;
                info!("Applied {} fix(es) to {}", fixed.fixes_applied, id);
                result = lint(&fixed.fixed_content);
            }
        }

        if self.enabled {
            match document.stat() {
                Ok(stat) => {
                    self.entries
                        .lock()
                        .insert(id.to_string(), CacheEntry::new(stat, result.clone()));
                }
                Err(e) => debug!("Not caching {}: {}", id, e),
            }
        }

        Ok(result)
    }

    /// Returns a copy of the entry for `id`.
    pub fn get(&self, id: &str) -> Option<CacheEntry> {
        self.entries.lock().get(id).cloned()
    }

    pub fn insert(&self, id: impl Into<String>, entry: CacheEntry) {
        self.entries.lock().insert(id.into(), entry);
    }

    /// Removes the entry for `id`, returning it.
    pub fn remove(&self, id: &str) -> Option<CacheEntry> {
        self.entries.lock().remove(id)
    }

    /// Returns all stored keys.
    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }

    /// Drops every entry whose key is not in `live`. Returns the number
    /// of entries removed.
    pub fn prune<'a>(&self, live: impl IntoIterator<Item = &'a str>) -> usize {
        let live: HashSet<&str> = live.into_iter().collect();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|key, _| live.contains(key.as_str()));
        let removed = before - entries.len();
        if removed > 0 {
            debug!("Pruned {} stale cache entries", removed);
        }
        removed
    }

    /// Loads the store from disk, replacing the in-memory entries.
    pub fn load(&mut self) -> Result<(), CacheError> {
        if !self.enabled {
            return Ok(());
        }

        if !self.path.exists() {
            debug!("No cache file found at {}", self.path.display());
            return Ok(());
        }

        let content = fs::read_to_string(&self.path)?;
        let entries: HashMap<String, CacheEntry> =
            serde_json::from_str(&content).map_err(|e| CacheError::corrupted(e.to_string()))?;

        info!("Loaded {} cache entries", entries.len());
        *self.entries.get_mut() = entries;

        Ok(())
    }

    /// Writes the store to disk.
    ///
    /// Keys are written in sorted order, so saving twice produces the same
    /// file.
    pub fn save(&self) -> Result<(), CacheError> {
        if !self.enabled {
            return Ok(());
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let entries = self.entries.lock();
        let sorted: BTreeMap<&String, &CacheEntry> = entries.iter().collect();
        let json = serde_json::to_string(&sorted)?;
        fs::write(&self.path, json)?;

        info!(
            "Saved {} cache entries to {}",
            entries.len(),
            self.path.display()
        );

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_LOCATION)
    }
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("path", &self.path)
            .field("entries", &self.len())
            .field("enabled", &self.enabled)
            .field("fix", &self.fix)
            .finish()
    }
}
