//! # omlscope
//!
//! Workspace symbol resolution and import synthesis for namespace-based
//! OML ontology documents.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → AnalysisHost: resolve, resolve_batch, link_document, ensure_imports
//!   ↓
//! hir       → Namespace/prefix index, symbol tables, resolver
//!   ↓
//! project   → Configuration, document cache, workspace discovery
//!   ↓
//! syntax    → SyntaxFile, Declaration, ParseError, DocumentParser
//!   ↓
//! parser    → Logos lexer, keyword escaping, top-level parser
//!   ↓
//! base      → Primitives (TextRange, LineIndex, constants)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax → project → hir → ide)
// ============================================================================

/// Foundation types: TextRange, LineIndex, domain constants
pub mod base;

/// Parser: Logos lexer and top-level recursive-descent parser
pub mod parser;

/// Syntax: parsed-document types and the parse capability
pub mod syntax;

/// Project management: configuration, cache, discovery
pub mod project;

/// High-level IR: namespaces, symbols, name resolution
pub mod hir;

/// Query surface: AnalysisHost and import synthesis
pub mod ide;

// Re-export commonly needed items
pub use parser::keywords;

pub use base::{LineCol, LineIndex, TextRange, TextSize};
pub use hir::{KindFilter, ResolveResult, SymbolKind};
pub use ide::{AnalysisHost, EnsureImportsResult, ResolveOutput};
pub use project::{WorkspaceConfig, WorkspaceError};
