//! Name resolution: turning a name token into a canonical qualified name.
//!
//! # Algorithm
//!
//! - **Qualified** (`prefix:Local`): `Local` is resolved as an unqualified
//!   name with the same kind filter. Failures propagate unchanged; on success
//!   the caller's prefix is kept as the displayed alias while the discovered
//!   namespace is reported for import.
//! - **Unqualified** (`Local`): every workspace document (the context
//!   document included) is searched for symbols named `Local` whose kind
//!   passes the filter.
//!   - no match → [`ResolveResult::NotFound`]
//!   - one match → [`ResolveResult::Found`]
//!   - several → [`ResolveResult::Ambiguous`] with candidates ranked local
//!     first, then already imported, then the rest, ties broken by alias.
//!
//! The resolver is stateless: it borrows already-loaded documents and never
//! performs I/O.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::link::{Link, LinkedReference, SymbolHandle};
use super::namespace::DocumentNamespace;
use super::symbols::{Symbol, SymbolKind, SymbolTable, UnknownKind};
use crate::parser::keywords;
use crate::syntax::Declaration;

// ============================================================================
// DOCUMENT VIEW
// ============================================================================

/// Read-only view of a loaded document, as needed by the resolver.
pub trait SymbolSource {
    fn path(&self) -> &Path;
    fn namespace(&self) -> &DocumentNamespace;
    fn symbols(&self) -> &SymbolTable;
}

impl<T: SymbolSource + ?Sized> SymbolSource for Arc<T> {
    fn path(&self) -> &Path {
        (**self).path()
    }

    fn namespace(&self) -> &DocumentNamespace {
        (**self).namespace()
    }

    fn symbols(&self) -> &SymbolTable {
        (**self).symbols()
    }
}

impl<T: SymbolSource + ?Sized> SymbolSource for &T {
    fn path(&self) -> &Path {
        (**self).path()
    }

    fn namespace(&self) -> &DocumentNamespace {
        (**self).namespace()
    }

    fn symbols(&self) -> &SymbolTable {
        (**self).symbols()
    }
}

// ============================================================================
// KIND FILTER
// ============================================================================

/// The set of symbol kinds acceptable for a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum KindFilter {
    /// Any kind is acceptable.
    #[default]
    Any,
    /// Only the listed kinds are acceptable.
    Only(BTreeSet<SymbolKind>),
}

impl KindFilter {
    pub fn only(kinds: impl IntoIterator<Item = SymbolKind>) -> Self {
        let kinds: BTreeSet<_> = kinds.into_iter().collect();
        if kinds.is_empty() {
            KindFilter::Any
        } else {
            KindFilter::Only(kinds)
        }
    }

    /// Aspect, Concept and RelationEntity.
    pub fn entity() -> Self {
        Self::only(SymbolKind::ENTITIES.iter().copied())
    }

    /// Parse kind names; `entity` expands to the entity group and an empty
    /// list means any kind.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self, UnknownKind> {
        let mut kinds = BTreeSet::new();
        for name in names {
            let name = name.as_ref();
            if name.eq_ignore_ascii_case("entity") {
                kinds.extend(SymbolKind::ENTITIES.iter().copied());
            } else {
                kinds.insert(name.parse::<SymbolKind>()?);
            }
        }
        Ok(Self::only(kinds))
    }

    pub fn matches(&self, kind: SymbolKind) -> bool {
        match self {
            KindFilter::Any => true,
            KindFilter::Only(kinds) => kinds.contains(&kind),
        }
    }
}

impl fmt::Display for KindFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KindFilter::Any => f.write_str("any kind"),
            KindFilter::Only(kinds) => {
                let names: Vec<_> = kinds.iter().map(|k| k.as_str()).collect();
                f.write_str(&names.join(" | "))
            }
        }
    }
}

// ============================================================================
// RESULTS
// ============================================================================

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Name to write in the context document: bare if local, else `alias:Local`.
    pub qualified_name: String,
    /// Alias used in `qualified_name`, `None` when the bare name is used.
    pub prefix: Option<SmolStr>,
    /// True if the context document must import `import_namespace`.
    pub needs_import: bool,
    pub import_namespace: Option<SmolStr>,
    pub name: SmolStr,
    pub kind: SymbolKind,
    /// Namespace of the document declaring the symbol.
    pub namespace: SmolStr,
    pub document: PathBuf,
}

impl Resolution {
    pub fn handle(&self) -> SymbolHandle {
        SymbolHandle {
            document: self.document.clone(),
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            kind: self.kind,
        }
    }
}

/// One candidate of an ambiguous resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub qualified_name: String,
    pub kind: SymbolKind,
    pub path: PathBuf,
    /// Declared prefix of the owning document.
    pub prefix: SmolStr,
    /// Namespace of the owning document.
    pub namespace: SmolStr,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {} in {})",
            self.qualified_name,
            self.kind,
            self.namespace,
            self.path.display()
        )
    }
}

/// Result of resolving one name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveResult {
    /// Successfully resolved to a single symbol.
    Found(Resolution),
    /// No symbol with that name and an acceptable kind exists.
    NotFound { reason: String },
    /// Several symbols match; candidates are ranked, the first is the best guess.
    Ambiguous {
        reason: String,
        candidates: Vec<Candidate>,
    },
}

impl ResolveResult {
    pub fn resolution(&self) -> Option<&Resolution> {
        match self {
            ResolveResult::Found(r) => Some(r),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ResolveResult::Found(_))
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, ResolveResult::Ambiguous { .. })
    }

    /// Plain-language reason for a failure.
    pub fn reason(&self) -> Option<&str> {
        match self {
            ResolveResult::Found(_) => None,
            ResolveResult::NotFound { reason } | ResolveResult::Ambiguous { reason, .. } => {
                Some(reason)
            }
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        match self {
            ResolveResult::Ambiguous { candidates, .. } => candidates,
            _ => &[],
        }
    }
}

/// A failed name inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveFailure {
    pub name: String,
    pub reason: String,
    pub candidates: Vec<Candidate>,
}

impl fmt::Display for ResolveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)?;
        for candidate in &self.candidates {
            write!(f, "\n    - {candidate}")?;
        }
        Ok(())
    }
}

/// Every failure of a batch, reported together.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} of the requested names could not be resolved:\n{}", .failures.len(), render_failures(.failures))]
pub struct BatchError {
    pub failures: Vec<ResolveFailure>,
}

fn render_failures(failures: &[ResolveFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("  {f}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Results of resolving several names against one context document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResolution {
    pub resolved: Vec<(String, Resolution)>,
    pub failures: Vec<ResolveFailure>,
}

impl BatchResolution {
    pub fn push(&mut self, name: impl Into<String>, result: ResolveResult) {
        let name = name.into();
        match result {
            ResolveResult::Found(resolution) => self.resolved.push((name, resolution)),
            ResolveResult::NotFound { reason } => self.failures.push(ResolveFailure {
                name,
                reason,
                candidates: Vec::new(),
            }),
            ResolveResult::Ambiguous { reason, candidates } => {
                self.failures.push(ResolveFailure {
                    name,
                    reason,
                    candidates,
                })
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// All resolutions, or every failure at once.
    pub fn into_result(self) -> Result<Vec<(String, Resolution)>, BatchError> {
        if self.failures.is_empty() {
            Ok(self.resolved)
        } else {
            Err(BatchError {
                failures: self.failures,
            })
        }
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// A symbol matching the requested name, with its relation to the context.
struct Match<'a> {
    symbol: &'a Symbol,
    owner: &'a DocumentNamespace,
    path: &'a Path,
    is_local: bool,
    is_imported: bool,
    alias: SmolStr,
}

impl Match<'_> {
    fn tier(&self) -> u8 {
        if self.is_local {
            0
        } else if self.is_imported {
            1
        } else {
            2
        }
    }

    fn qualified_name(&self) -> String {
        if self.is_local {
            keywords::escape(&self.symbol.name)
        } else {
            format!("{}:{}", self.alias, self.symbol.name)
        }
    }
}

/// Resolver for name lookups over a set of loaded documents.
pub struct Resolver<'a, D> {
    context: &'a D,
    documents: &'a [D],
}

impl<'a, D: SymbolSource> Resolver<'a, D> {
    /// `documents` is the discovered workspace; it may or may not contain `context`.
    pub fn new(context: &'a D, documents: &'a [D]) -> Self {
        Self { context, documents }
    }

    pub fn context(&self) -> &'a D {
        self.context
    }

    /// Resolve a bare or qualified name.
    pub fn resolve(&self, name: &str, filter: &KindFilter) -> ResolveResult {
        let name = name.trim();
        match name.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() => {
                self.resolve_qualified(prefix, local, filter)
            }
            Some((_, local)) if !local.is_empty() => self.resolve_unqualified(local, filter),
            _ => self.resolve_unqualified(name, filter),
        }
    }

    /// Resolve each name and aggregate every failure.
    pub fn resolve_batch<S: AsRef<str>>(&self, names: &[S], filter: &KindFilter) -> BatchResolution {
        let mut batch = BatchResolution::default();
        for name in names {
            let name = name.as_ref();
            batch.push(name, self.resolve(name, filter));
        }
        batch
    }

    fn resolve_qualified(&self, prefix: &str, local: &str, filter: &KindFilter) -> ResolveResult {
        match self.resolve_unqualified(local, filter) {
            ResolveResult::Found(found) => {
                tracing::trace!(
                    prefix,
                    local,
                    namespace = %found.namespace,
                    "qualified name resolved through bare lookup"
                );
                ResolveResult::Found(Resolution {
                    qualified_name: format!("{prefix}:{}", found.name),
                    prefix: Some(SmolStr::new(prefix)),
                    ..found
                })
            }
            failure => failure,
        }
    }

    fn resolve_unqualified(&self, name: &str, filter: &KindFilter) -> ResolveResult {
        let name = keywords::unescape(name);
        let mut matches = self.collect_matches(name, filter);

        match matches.len() {
            0 => {
                let restriction = match filter {
                    KindFilter::Any => String::new(),
                    KindFilter::Only(_) => format!(" of kind {filter}"),
                };
                ResolveResult::NotFound {
                    reason: format!(
                        "No symbol named '{name}'{restriction} was found in the workspace. \
                         Use workspace discovery to find the correct name."
                    ),
                }
            }
            1 => {
                let found = matches.remove(0);
                let needs_import = !found.is_imported;
                tracing::debug!(
                    name,
                    qualified = %found.qualified_name(),
                    needs_import,
                    "resolved"
                );
                ResolveResult::Found(Resolution {
                    qualified_name: found.qualified_name(),
                    prefix: (!found.is_local).then(|| found.alias.clone()),
                    needs_import,
                    import_namespace: needs_import.then(|| found.owner.namespace.clone()),
                    name: found.symbol.name.clone(),
                    kind: found.symbol.kind,
                    namespace: found.owner.namespace.clone(),
                    document: found.path.to_path_buf(),
                })
            }
            count => {
                matches.sort_by(|a, b| {
                    a.tier()
                        .cmp(&b.tier())
                        .then_with(|| {
                            keywords::unescape(&a.alias).cmp(keywords::unescape(&b.alias))
                        })
                        .then_with(|| a.path.cmp(b.path))
                });
                let candidates: Vec<Candidate> = matches
                    .iter()
                    .map(|m| Candidate {
                        qualified_name: m.qualified_name(),
                        kind: m.symbol.kind,
                        path: m.path.to_path_buf(),
                        prefix: m.owner.prefix.clone(),
                        namespace: m.owner.namespace.clone(),
                    })
                    .collect();
                let listed: Vec<_> = candidates
                    .iter()
                    .map(|c| c.qualified_name.as_str())
                    .collect();
                tracing::debug!(name, count, "ambiguous");
                ResolveResult::Ambiguous {
                    reason: format!(
                        "'{name}' is ambiguous: {count} symbols match ({}). \
                         Qualify the name with the intended prefix.",
                        listed.join(", ")
                    ),
                    candidates,
                }
            }
        }
    }

    fn collect_matches(&self, name: &str, filter: &KindFilter) -> Vec<Match<'a>> {
        let context: &'a D = self.context;
        let context_ns = context.namespace();
        let context_path = context.path();

        let mut seen: FxHashSet<&Path> = FxHashSet::default();
        let mut matches = Vec::new();

        for doc in std::iter::once(context).chain(self.documents.iter()) {
            let path = doc.path();
            if !seen.insert(path) {
                continue;
            }
            let Some(symbol) = doc.symbols().get(name) else {
                continue;
            };
            if !filter.matches(symbol.kind) {
                continue;
            }

            let owner = doc.namespace();
            let is_local = path == context_path;
            let import = context_ns.import_of(&owner.namespace);
            let alias = match import.and_then(|i| i.alias.clone()) {
                Some(alias) => alias,
                None => owner.prefix.clone(),
            };
            matches.push(Match {
                symbol,
                owner,
                path,
                is_local,
                is_imported: is_local || import.is_some(),
                alias,
            });
        }
        matches
    }

    /// Resolve every type reference of `declarations` into a [`Link`].
    pub fn link_references(&self, declarations: &[Declaration]) -> Vec<LinkedReference> {
        declarations
            .iter()
            .flat_map(|decl| decl.references.iter().map(move |r| (decl, r)))
            .map(|(decl, reference)| {
                let (link, failure) = match self.resolve(&reference.text, &KindFilter::Any) {
                    ResolveResult::Found(found) => (Link::Resolved(found.handle()), None),
                    other => (
                        Link::Unresolved(reference.text.clone()),
                        other.reason().map(str::to_string),
                    ),
                };
                LinkedReference {
                    declaration: decl.name.clone(),
                    reference: reference.clone(),
                    link,
                    failure,
                }
            })
            .collect()
    }
}
