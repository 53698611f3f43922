//! Workspace discovery: which documents make up the workspace.
//!
//! The live index is asked first when one is configured. A timeout, a
//! transport or protocol failure, or an empty answer falls back to a
//! filesystem scan of the workspace root.

use std::path::PathBuf;

use super::config::WorkspaceConfig;
use super::error::{Result, WorkspaceError};
use super::file_loader;
use super::index_client::IndexClient;

/// Where a document list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoverySource {
    LiveIndex,
    FilesystemScan,
}

/// Candidate documents, canonical, sorted and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovered {
    pub documents: Vec<PathBuf>,
    pub source: DiscoverySource,
}

/// Lists candidate documents for resolution.
#[derive(Debug)]
pub struct Discoverer {
    root: PathBuf,
    extension: String,
    ignored_dirs: Vec<String>,
    index: Option<IndexClient>,
}

impl Discoverer {
    pub fn new(config: &WorkspaceConfig) -> Self {
        let index = config
            .index_socket
            .as_ref()
            .map(|socket| IndexClient::new(socket).with_timeout(config.index_timeout));
        Self {
            root: config.root.clone(),
            extension: config.extension.clone(),
            ignored_dirs: config.ignored_dirs.clone(),
            index,
        }
    }

    pub fn index(&self) -> Option<&IndexClient> {
        self.index.as_ref()
    }

    /// Canonical paths of every candidate document.
    pub async fn list_candidate_documents(&self) -> Result<Vec<PathBuf>> {
        Ok(self.discover().await?.documents)
    }

    /// Like [`Self::list_candidate_documents`], also reporting the strategy used.
    pub async fn discover(&self) -> Result<Discovered> {
        if let Some(index) = &self.index {
            match index.documents(&self.extension).await {
                Ok(documents) if !documents.is_empty() => {
                    return Ok(Discovered {
                        documents,
                        source: DiscoverySource::LiveIndex,
                    });
                }
                Ok(_) => tracing::debug!("live index listed no documents, scanning workspace"),
                Err(e) => tracing::warn!(error = %e, "live index unavailable, scanning workspace"),
            }
        }

        let documents = self.scan().await?;
        Ok(Discovered {
            documents,
            source: DiscoverySource::FilesystemScan,
        })
    }

    /// Walk the workspace root on the blocking pool.
    pub async fn scan(&self) -> Result<Vec<PathBuf>> {
        let root = self.root.clone();
        let extension = self.extension.clone();
        let ignored = self.ignored_dirs.clone();
        tokio::task::spawn_blocking(move || {
            file_loader::collect_file_paths(&root, &extension, &ignored)
        })
        .await
        .map_err(|e| WorkspaceError::Discovery(format!("filesystem scan aborted: {e}")))?
    }
}
