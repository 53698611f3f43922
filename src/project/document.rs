//! A parsed document as held by the cache.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::SystemTime;

use crate::hir::{DocumentNamespace, SymbolSource, SymbolTable, extract_symbols};
use crate::syntax::SyntaxFile;

/// One parsed document.
///
/// The namespace index and the symbol table are built on first use and live
/// exactly as long as this value; a reparse produces a new `Document`.
#[derive(Debug)]
pub struct Document {
    path: PathBuf,
    modified: SystemTime,
    text: Arc<str>,
    syntax: SyntaxFile,
    namespace: OnceLock<DocumentNamespace>,
    symbols: OnceLock<SymbolTable>,
}

impl Document {
    pub fn new(path: PathBuf, modified: SystemTime, text: Arc<str>, syntax: SyntaxFile) -> Self {
        Self {
            path,
            modified,
            text,
            syntax,
            namespace: OnceLock::new(),
            symbols: OnceLock::new(),
        }
    }

    /// Canonical absolute path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Modification time recorded when the document was read.
    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn syntax(&self) -> &SyntaxFile {
        &self.syntax
    }

    pub fn namespace_index(&self) -> &DocumentNamespace {
        self.namespace
            .get_or_init(|| DocumentNamespace::from_syntax(&self.syntax))
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        self.symbols.get_or_init(|| extract_symbols(&self.syntax))
    }
}

impl SymbolSource for Document {
    fn path(&self) -> &Path {
        &self.path
    }

    fn namespace(&self) -> &DocumentNamespace {
        self.namespace_index()
    }

    fn symbols(&self) -> &SymbolTable {
        self.symbol_table()
    }
}
