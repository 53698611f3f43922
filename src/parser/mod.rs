//! Parser for OML-style documents.
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with TokenKind and TextRange
//!     ↓
//! Parser → SyntaxFile (header, imports, top-level declarations)
//! ```
//!
//! Only the top-level structure is parsed. Declaration bodies are scanned for
//! role names and type references and otherwise skipped, which is all name
//! resolution needs.

#[allow(clippy::module_inception)]
mod parser;

pub mod keywords;
mod lexer;

pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use parser::parse_document;
