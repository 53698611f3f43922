//! On-disk workspaces in temporary directories.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use omlscope::syntax::DocumentParser;
use omlscope::{AnalysisHost, WorkspaceConfig};
use tempfile::TempDir;

/// A temporary workspace root holding document files.
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp workspace"),
        }
    }

    /// Builder form of [`Self::write`].
    pub fn with_file(self, name: &str, text: &str) -> Self {
        self.write(name, text);
        self
    }

    /// Canonical workspace root.
    pub fn root(&self) -> PathBuf {
        std::fs::canonicalize(self.dir.path()).unwrap()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    pub fn write(&self, name: &str, text: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, text).unwrap();
        path
    }

    /// Rewrite a file so caches always see the change.
    pub fn rewrite(&self, name: &str, text: &str) {
        rewrite(&self.path(name), text);
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).unwrap()
    }

    pub fn config(&self) -> WorkspaceConfig {
        WorkspaceConfig::new(self.root())
    }

    pub fn host(&self) -> AnalysisHost {
        AnalysisHost::new(self.config())
    }

    pub fn host_with_parser(&self, parser: Arc<dyn DocumentParser>) -> AnalysisHost {
        AnalysisHost::with_parser(self.config(), parser)
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Rewrite a file and push its mtime forward so the change is always visible.
pub fn rewrite(path: &Path, text: &str) {
    let before = std::fs::metadata(path).unwrap().modified().unwrap();
    std::fs::write(path, text).unwrap();
    let file = std::fs::File::options().write(true).open(path).unwrap();
    file.set_modified(before + Duration::from_secs(10)).unwrap();
}
