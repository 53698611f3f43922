//! Document cache keyed by canonical path and validated by modification time.
//!
//! Entries are kept in insertion order. When the cache is full the oldest
//! inserted entry is evicted; reloading a changed document counts as a new
//! insertion. Failed loads are never cached.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use indexmap::IndexMap;
use parking_lot::Mutex;

use super::document::Document;
use super::error::{Result, WorkspaceError};
use crate::base::constants::DEFAULT_CACHE_CAPACITY;
use crate::syntax::{DocumentParser, OmlParser};

/// Bounded FIFO cache of parsed documents.
pub struct DocumentCache {
    parser: Arc<dyn DocumentParser>,
    capacity: usize,
    entries: Mutex<IndexMap<PathBuf, Arc<Document>>>,
}

impl std::fmt::Debug for DocumentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

impl Default for DocumentCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl DocumentCache {
    /// A cache using the bundled [`OmlParser`]. A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        Self::with_parser(capacity, Arc::new(OmlParser))
    }

    pub fn with_parser(capacity: usize, parser: Arc<dyn DocumentParser>) -> Self {
        Self {
            parser,
            capacity: capacity.max(1),
            entries: Mutex::new(IndexMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// True if a document is cached under this canonical path (fresh or not).
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.lock().contains_key(path)
    }

    /// Cached paths, oldest insertion first.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries.lock().keys().cloned().collect()
    }

    /// Get a document, reloading it when the file changed since it was cached.
    ///
    /// A document that cannot be read or parsed is evicted and the error returned.
    pub async fn get(&self, path: &Path) -> Result<Arc<Document>> {
        let path = match tokio::fs::canonicalize(path).await {
            Ok(path) => path,
            Err(e) => {
                self.evict_unreachable(path).await;
                return Err(WorkspaceError::io(path, e));
            }
        };

        let modified = match modified_time(&path).await {
            Ok(modified) => modified,
            Err(e) => {
                self.evict(&path);
                return Err(e);
            }
        };

        if let Some(doc) = self.lookup(&path, modified) {
            tracing::trace!(path = %path.display(), "cache hit");
            return Ok(doc);
        }

        tracing::trace!(path = %path.display(), "cache miss");
        match self.load(&path, modified).await {
            Ok(doc) => Ok(self.insert(doc)),
            Err(e) => {
                self.evict(&path);
                Err(e)
            }
        }
    }

    /// Evict one document, or everything when `path` is `None`.
    pub fn invalidate(&self, path: Option<&Path>) {
        match path {
            Some(path) => self.evict(path),
            None => {
                let mut entries = self.entries.lock();
                tracing::debug!(count = entries.len(), "cache cleared");
                entries.clear();
            }
        }
    }

    fn lookup(&self, path: &Path, modified: SystemTime) -> Option<Arc<Document>> {
        let entries = self.entries.lock();
        entries
            .get(path)
            .filter(|doc| doc.modified() == modified)
            .cloned()
    }

    async fn load(&self, path: &Path, modified: SystemTime) -> Result<Document> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| WorkspaceError::io(path, e))?;
        let syntax = self
            .parser
            .parse(&text)
            .map_err(|e| WorkspaceError::parse(path, e.to_string()))?;
        if syntax.has_errors() {
            tracing::debug!(
                path = %path.display(),
                errors = syntax.diagnostics.len(),
                "document parsed with recoverable errors"
            );
        }
        Ok(Document::new(
            path.to_path_buf(),
            modified,
            Arc::from(text),
            syntax,
        ))
    }

    /// Insert a freshly loaded document and evict the oldest entry on overflow.
    ///
    /// If another task already cached the same revision, that entry is kept
    /// and returned instead.
    fn insert(&self, doc: Document) -> Arc<Document> {
        let mut entries = self.entries.lock();
        if let Some(existing) = entries.get(doc.path())
            && existing.modified() == doc.modified()
        {
            return Arc::clone(existing);
        }

        let doc = Arc::new(doc);
        entries.shift_remove(doc.path());
        entries.insert(doc.path().to_path_buf(), Arc::clone(&doc));
        if entries.len() > self.capacity
            && let Some((evicted, _)) = entries.shift_remove_index(0)
        {
            tracing::debug!(path = %evicted.display(), "cache full, evicted oldest document");
        }
        doc
    }

    /// Evict what a path that no longer canonicalizes may have been cached as.
    ///
    /// The canonical key is unknown here, so this drops the lexically
    /// normalized path and every entry whose file is gone.
    async fn evict_unreachable(&self, path: &Path) {
        self.evict(&normalize(path));
        for key in self.paths() {
            if !tokio::fs::try_exists(&key).await.unwrap_or(false) {
                self.evict(&key);
            }
        }
    }

    fn evict(&self, path: &Path) {
        if self.entries.lock().shift_remove(path).is_some() {
            tracing::trace!(path = %path.display(), "evicted");
        }
    }
}

/// Absolute form of `path` with `.` and `..` resolved without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Current modification time of the file at `path`.
pub(crate) async fn modified_time(path: &Path) -> Result<SystemTime> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| WorkspaceError::io(path, e))?;
    metadata.modified().map_err(|e| WorkspaceError::io(path, e))
}
