//! AnalysisHost: the context object behind every workspace query.
//!
//! The host owns the configuration, the shared [`DocumentCache`] and the
//! [`Discoverer`]. Each query loads the workspace concurrently, then fetches
//! the context document through the cache so it is validated after every
//! load has finished. Context failures are returned as errors; other
//! documents that fail to load are skipped and reported as [`Diagnostic`]s
//! next to the result.
//!
//! ## Usage
//!
//! ```ignore
//! let host = AnalysisHost::new(WorkspaceConfig::load("/path/to/workspace")?);
//!
//! let output = host.resolve("Foo", Path::new("/path/to/workspace/b.oml"), &KindFilter::Any).await?;
//! if let ResolveResult::Found(found) = output.result {
//!     println!("{} (import needed: {})", found.qualified_name, found.needs_import);
//! }
//!
//! let imports = host.ensure_imports(Path::new("/path/to/workspace/b.oml")).await?;
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tokio::task::JoinSet;

use super::imports::{AddedImport, ImportPlan, NamespaceLookup, plan_imports};
use crate::hir::{
    BatchResolution, Diagnostic, DiagnosticCollector, KindFilter, LinkedReference, ResolveResult,
    Resolver,
};
use crate::project::{
    Discovered, Discoverer, Document, DocumentCache, Result, WorkspaceConfig, WorkspaceError,
    modified_time,
};
use crate::syntax::DocumentParser;

/// Plans attempted by `ensure_imports` before giving up on a document that
/// keeps changing underneath it.
const MAX_IMPORT_ATTEMPTS: usize = 3;

/// A query result together with the documents that had to be skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOutput<T = ResolveResult> {
    pub result: T,
    pub diagnostics: Vec<Diagnostic>,
}

/// Outcome of [`AnalysisHost::ensure_imports`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnsureImportsResult {
    pub added: Vec<AddedImport>,
    /// Prefixes used in the document that no namespace could be found for.
    pub unresolved: Vec<SmolStr>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Every loadable document of the workspace, sorted by path.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceSnapshot {
    pub documents: Vec<Arc<Document>>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Owns the workspace state shared by all queries.
#[derive(Debug)]
pub struct AnalysisHost {
    config: WorkspaceConfig,
    cache: Arc<DocumentCache>,
    discoverer: Discoverer,
}

impl AnalysisHost {
    pub fn new(config: WorkspaceConfig) -> Self {
        let cache = DocumentCache::new(config.cache_capacity);
        Self::with_cache(config, cache)
    }

    /// Use a different parse capability than the bundled parser.
    pub fn with_parser(config: WorkspaceConfig, parser: Arc<dyn DocumentParser>) -> Self {
        let cache = DocumentCache::with_parser(config.cache_capacity, parser);
        Self::with_cache(config, cache)
    }

    fn with_cache(config: WorkspaceConfig, cache: DocumentCache) -> Self {
        let discoverer = Discoverer::new(&config);
        Self {
            config,
            cache: Arc::new(cache),
            discoverer,
        }
    }

    /// Configuration from `root`, including its optional configuration file.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let config = WorkspaceConfig::load(root)?.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    pub fn discoverer(&self) -> &Discoverer {
        &self.discoverer
    }

    /// Load one document through the cache.
    pub async fn document(&self, path: &Path) -> Result<Arc<Document>> {
        self.cache.get(path).await
    }

    /// Discover and load every workspace document concurrently.
    ///
    /// Returns once every load has finished. Failed loads become diagnostics.
    pub async fn load_workspace(&self) -> Result<WorkspaceSnapshot> {
        let Discovered { documents: paths, source } = self.discoverer.discover().await?;
        tracing::debug!(?source, count = paths.len(), "loading workspace documents");

        let mut tasks = JoinSet::new();
        let mut pending = FxHashMap::default();
        for path in paths {
            let cache = Arc::clone(&self.cache);
            let task_path = path.clone();
            let handle = tasks.spawn(async move { cache.get(&task_path).await });
            pending.insert(handle.id(), path);
        }

        let mut documents = Vec::new();
        let mut diagnostics = DiagnosticCollector::new();
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, Ok(doc))) => documents.push(doc),
                Ok((id, Err(e))) => {
                    if let Some(path) = pending.remove(&id) {
                        diagnostics.skipped(path, e);
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "document load task failed");
                    if let Some(path) = pending.remove(&e.id()) {
                        diagnostics.skipped(path, e);
                    }
                }
            }
        }
        documents.sort_by(|a, b| a.path().cmp(b.path()));

        Ok(WorkspaceSnapshot {
            documents,
            diagnostics: diagnostics.finish(),
        })
    }

    /// Resolve `name` as written in the document at `context`.
    pub async fn resolve(
        &self,
        name: &str,
        context: &Path,
        filter: &KindFilter,
    ) -> Result<ResolveOutput> {
        let snapshot = self.load_workspace().await?;
        let context = self.cache.get(context).await?;
        let resolver = Resolver::new(&context, &snapshot.documents);
        Ok(ResolveOutput {
            result: resolver.resolve(name, filter),
            diagnostics: snapshot.diagnostics,
        })
    }

    /// Resolve several names against one context, collecting every failure.
    pub async fn resolve_batch<S: AsRef<str>>(
        &self,
        names: &[S],
        context: &Path,
        filter: &KindFilter,
    ) -> Result<ResolveOutput<BatchResolution>> {
        let snapshot = self.load_workspace().await?;
        let context = self.cache.get(context).await?;
        let resolver = Resolver::new(&context, &snapshot.documents);
        let batch = resolver.resolve_batch(names, filter);
        tracing::debug!(
            resolved = batch.resolved.len(),
            failed = batch.failures.len(),
            "batch resolved"
        );
        Ok(ResolveOutput {
            result: batch,
            diagnostics: snapshot.diagnostics,
        })
    }

    /// Bind every type reference of a document to the symbol it names.
    pub async fn link_document(&self, path: &Path) -> Result<ResolveOutput<Vec<LinkedReference>>> {
        let snapshot = self.load_workspace().await?;
        let context = self.cache.get(path).await?;
        let resolver = Resolver::new(&context, &snapshot.documents);
        Ok(ResolveOutput {
            result: resolver.link_references(&context.syntax().declarations),
            diagnostics: snapshot.diagnostics,
        })
    }

    /// Add the imports the document at `path` needs, rewriting the file.
    ///
    /// Unresolvable prefixes are reported without aborting the other additions.
    /// The file is only written if it is unchanged since it was planned;
    /// otherwise the plan is rebuilt from the new text.
    pub async fn ensure_imports(&self, path: &Path) -> Result<EnsureImportsResult> {
        let snapshot = self.load_workspace().await?;
        let lookup = NamespaceLookup::from_documents(&snapshot.documents);

        let mut attempts = 0;
        let plan = loop {
            attempts += 1;
            let context = self.cache.get(path).await?;
            let mut lookup = lookup.clone();
            lookup.add(&context);
            let plan = plan_imports(context.syntax(), context.text(), &lookup);
            let Some(edit) = plan.edit.clone() else {
                break plan;
            };

            if modified_time(context.path()).await? != context.modified() {
                tracing::debug!(
                    path = %context.path().display(),
                    attempts,
                    "document changed while imports were planned"
                );
                if attempts >= MAX_IMPORT_ATTEMPTS {
                    return Err(WorkspaceError::Changed {
                        path: context.path().to_path_buf(),
                    });
                }
                continue;
            }

            let text = edit.apply(context.text());
            tokio::fs::write(context.path(), text)
                .await
                .map_err(|e| WorkspaceError::io(context.path(), e))?;
            self.cache.invalidate(Some(context.path()));
            tracing::debug!(
                path = %context.path().display(),
                added = plan.added.len(),
                "imports added"
            );
            break plan;
        };

        let ImportPlan {
            added, unresolved, ..
        } = plan;
        if !unresolved.is_empty() {
            tracing::debug!(
                path = %path.display(),
                unresolved = ?unresolved,
                "prefixes without a known namespace"
            );
        }

        Ok(EnsureImportsResult {
            added,
            unresolved,
            diagnostics: snapshot.diagnostics,
        })
    }
}
