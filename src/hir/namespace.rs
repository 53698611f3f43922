//! Namespace, prefix and import index.
//!
//! [`DocumentNamespace`] is the per-document view (declared namespace,
//! declared prefix, imports). [`PrefixIndex`] aggregates the declared
//! prefixes of every document in the workspace.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::parser::keywords;
use crate::syntax::{DocumentKind, ImportKind, SyntaxFile};

/// An import of another namespace into a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub kind: ImportKind,
    pub namespace: SmolStr,
    /// Local alias as written (may carry the `^` escape marker).
    pub alias: Option<SmolStr>,
}

impl Import {
    /// Alias used for this import in the importing document: the explicit
    /// alias, else the declared prefix of the document owning the namespace.
    pub fn effective_alias<'a>(&'a self, prefixes: &'a PrefixIndex) -> Option<&'a str> {
        self.alias
            .as_deref()
            .or_else(|| prefixes.prefix_for(&self.namespace))
    }
}

/// Namespace, prefix and imports declared by one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentNamespace {
    pub kind: DocumentKind,
    pub namespace: SmolStr,
    /// Declared prefix as written (may carry the `^` escape marker).
    pub prefix: SmolStr,
    pub imports: Vec<Import>,
}

impl DocumentNamespace {
    pub fn from_syntax(file: &SyntaxFile) -> Self {
        Self {
            kind: file.header.kind,
            namespace: file.header.namespace.clone(),
            prefix: file.header.prefix.clone(),
            imports: file
                .imports
                .iter()
                .map(|import| Import {
                    kind: import.kind,
                    namespace: import.namespace.clone(),
                    alias: import.alias.clone(),
                })
                .collect(),
        }
    }

    /// Declared prefix without escape marker.
    pub fn prefix_name(&self) -> &str {
        keywords::unescape(&self.prefix)
    }

    /// The import of `namespace`, if any.
    pub fn import_of(&self, namespace: &str) -> Option<&Import> {
        self.imports.iter().find(|i| i.namespace == namespace)
    }

    pub fn imports_namespace(&self, namespace: &str) -> bool {
        self.import_of(namespace).is_some()
    }
}

/// Workspace-wide prefix ⇄ namespace map built from declared headers.
#[derive(Debug, Clone, Default)]
pub struct PrefixIndex {
    by_prefix: FxHashMap<SmolStr, SmolStr>,
    by_namespace: FxHashMap<SmolStr, SmolStr>,
}

impl PrefixIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a document's own declaration. The first declaration of a prefix wins.
    pub fn add(&mut self, ns: &DocumentNamespace) {
        let prefix = SmolStr::new(ns.prefix_name());
        match self.by_prefix.get(&prefix) {
            Some(existing) if *existing != ns.namespace => {
                tracing::debug!(
                    prefix = %prefix,
                    kept = %existing,
                    ignored = %ns.namespace,
                    "prefix declared by more than one namespace"
                );
            }
            Some(_) => {}
            None => {
                self.by_prefix.insert(prefix, ns.namespace.clone());
            }
        }
        self.by_namespace
            .entry(ns.namespace.clone())
            .or_insert_with(|| ns.prefix.clone());
    }

    /// Namespace declared with `prefix` (escape marker ignored).
    pub fn namespace_for(&self, prefix: &str) -> Option<&str> {
        self.by_prefix
            .get(keywords::unescape(prefix))
            .map(SmolStr::as_str)
    }

    /// Declared prefix of the document owning `namespace`, as written.
    pub fn prefix_for(&self, namespace: &str) -> Option<&str> {
        self.by_namespace.get(namespace).map(SmolStr::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_prefix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_prefix.is_empty()
    }
}

impl<'a> FromIterator<&'a DocumentNamespace> for PrefixIndex {
    fn from_iter<I: IntoIterator<Item = &'a DocumentNamespace>>(iter: I) -> Self {
        let mut index = PrefixIndex::new();
        for ns in iter {
            index.add(ns);
        }
        index
    }
}
