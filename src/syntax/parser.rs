//! Syntax-level parsing interface.

use thiserror::Error;

use crate::base::LineCol;
use crate::syntax::file::SyntaxFile;

/// A document that could not be turned into a [`SyntaxFile`] at all.
///
/// Recoverable problems do not produce this error; they are reported as
/// [`SyntaxDiagnostic`](super::SyntaxDiagnostic)s on a successful parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: LineCol,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: LineCol) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// The parse capability consumed by the document cache.
pub trait DocumentParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<SyntaxFile, ParseError>;
}

/// Parser for the OML-style document syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct OmlParser;

impl DocumentParser for OmlParser {
    fn parse(&self, text: &str) -> Result<SyntaxFile, ParseError> {
        crate::parser::parse_document(text)
    }
}
