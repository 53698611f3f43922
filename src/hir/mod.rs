//! High-level IR (HIR): the semantic model used for name resolution.
//!
//! ## Key Types
//!
//! - [`DocumentNamespace`]: declared namespace, prefix and imports of a document
//! - [`PrefixIndex`]: workspace-wide prefix ⇄ namespace map
//! - [`SymbolTable`] / [`Symbol`]: named declarations of a document
//! - [`Resolver`]: name resolution with kind filtering and ranking
//! - [`Link`]: a reference that is either textual or bound to a symbol
//!
//! ## Layers
//!
//! ```text
//! SyntaxFile                 ← parsed document (per file)
//!     │
//!     ├── DocumentNamespace  ← namespace / prefix / imports
//!     └── SymbolTable        ← declarations + role names
//!             │
//!             ▼
//! Resolver(context, docs)    ← Found | NotFound | Ambiguous
//! ```

mod diagnostics;
mod link;
mod namespace;
mod resolve;
mod symbols;

pub use diagnostics::{Diagnostic, DiagnosticCollector, Severity};
pub use link::{Link, LinkedReference, SymbolHandle};
pub use namespace::{DocumentNamespace, Import, PrefixIndex};
pub use resolve::{
    BatchError, BatchResolution, Candidate, KindFilter, Resolution, ResolveFailure, ResolveResult,
    Resolver, SymbolSource,
};
pub use symbols::{Symbol, SymbolKind, SymbolTable, UnknownKind, extract_symbols};
