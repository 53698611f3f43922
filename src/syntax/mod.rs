//! Syntax layer: parsed document types and the parse capability.
//!
//! The resolver never looks at raw text. It consumes [`SyntaxFile`] values
//! produced by a [`DocumentParser`]; [`OmlParser`] is the bundled implementation.

pub mod file;
pub mod parser;

pub use file::{
    Declaration, DeclarationKind, DocumentHeader, DocumentKind, ImportDecl, ImportKind, RefRole,
    RoleDecl, SyntaxDiagnostic, SyntaxFile, TypeRef,
};
pub use parser::{DocumentParser, OmlParser, ParseError};
