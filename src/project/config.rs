//! Workspace configuration.
//!
//! Defaults cover the common case; a `.omlresolve.toml` file at the
//! workspace root may override them:
//!
//! ```toml
//! extension = "oml"
//! cache-capacity = 50
//! index-socket = "/tmp/oml-index.sock"
//! index-timeout-ms = 3000
//! ignore = ["generated"]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::error::{Result, WorkspaceError};
use crate::base::constants::{
    CONFIG_FILE_NAME, DEFAULT_CACHE_CAPACITY, DEFAULT_INDEX_TIMEOUT, DOCUMENT_EXTENSION,
};

/// Settings shared by the cache, the discoverer and the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceConfig {
    /// Root directory scanned when the live index is unavailable.
    pub root: PathBuf,
    /// Extension of candidate documents, without the dot.
    pub extension: String,
    pub cache_capacity: usize,
    /// Unix socket of the live workspace index, if one is running.
    pub index_socket: Option<PathBuf>,
    pub index_timeout: Duration,
    /// Extra directory names skipped by the filesystem scan.
    pub ignored_dirs: Vec<String>,
}

impl WorkspaceConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DOCUMENT_EXTENSION.to_string(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            index_socket: None,
            index_timeout: DEFAULT_INDEX_TIMEOUT,
            ignored_dirs: Vec::new(),
        }
    }

    /// Defaults, overridden by `.omlresolve.toml` in `root` when present.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let path = root.join(CONFIG_FILE_NAME);
        let config = Self::new(root);
        match std::fs::read_to_string(&path) {
            Ok(text) => config.merge_toml(&path, &text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(config),
            Err(e) => Err(WorkspaceError::io(path, e)),
        }
    }

    fn merge_toml(mut self, path: &Path, text: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(text)
            .map_err(|e| WorkspaceError::Config(format!("{}: {e}", path.display())))?;
        if let Some(extension) = raw.extension {
            self.extension = extension.trim_start_matches('.').to_string();
        }
        if let Some(capacity) = raw.cache_capacity {
            self.cache_capacity = capacity;
        }
        if let Some(socket) = raw.index_socket {
            self.index_socket = Some(self.root.join(socket));
        }
        if let Some(ms) = raw.index_timeout_ms {
            self.index_timeout = Duration::from_millis(ms);
        }
        if let Some(ignore) = raw.ignore {
            self.ignored_dirs = ignore;
        }
        tracing::debug!(config = %path.display(), "loaded workspace configuration");
        self.validate()
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_index_socket(mut self, socket: impl Into<PathBuf>) -> Self {
        self.index_socket = Some(socket.into());
        self
    }

    pub fn with_index_timeout(mut self, timeout: Duration) -> Self {
        self.index_timeout = timeout;
        self
    }

    pub fn with_ignored_dir(mut self, name: impl Into<String>) -> Self {
        self.ignored_dirs.push(name.into());
        self
    }

    pub fn validate(self) -> Result<Self> {
        if self.cache_capacity == 0 {
            return Err(WorkspaceError::Config(
                "cache capacity must be at least 1".to_string(),
            ));
        }
        if self.extension.is_empty() {
            return Err(WorkspaceError::Config(
                "document extension must not be empty".to_string(),
            ));
        }
        Ok(self)
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawConfig {
    extension: Option<String>,
    cache_capacity: Option<usize>,
    index_socket: Option<PathBuf>,
    index_timeout_ms: Option<u64>,
    ignore: Option<Vec<String>>,
}
