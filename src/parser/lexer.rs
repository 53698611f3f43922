//! Logos-based lexer for OML documents.
//!
//! Whitespace and comments are skipped; every other byte of the input is
//! covered by exactly one token (unknown characters become [`TokenKind::Error`]).

use logos::Logos;

use super::keywords;
use crate::base::{TextRange, TextSize};

/// A token with its kind, text, and position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
}

impl Token<'_> {
    /// True if this token ends exactly where `next` starts.
    pub fn touches(&self, next: &Token<'_>) -> bool {
        self.range.end() == next.range.start()
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.next()?;
        let span = self.inner.span();
        let range = TextRange::new(
            TextSize::from(span.start as u32),
            TextSize::from(span.end as u32),
        );
        Some(Token {
            kind: result.unwrap_or(TokenKind::Error),
            text: self.inner.slice(),
            range,
        })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum TokenKind {
    /// `<http://example.com/ns#>`
    #[regex(r"<[^<>\s]*>")]
    Iri,

    /// Identifier, optionally escaped with a leading `^`.
    ///
    /// Non-ASCII runs are accepted only when they form a Unicode identifier.
    #[regex(
        r"\^?([A-Za-z_]|[^\x00-\x7F])([A-Za-z0-9_\-]|[^\x00-\x7F])*",
        |lex| keywords::is_identifier(lex.slice())
    )]
    Ident,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    #[regex(r"-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    Number,

    #[token("^^")]
    CaretCaret,

    #[token("->")]
    Arrow,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(":")]
    Colon,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("=")]
    Eq,

    #[token(",")]
    Comma,

    #[token("@")]
    At,

    #[token(".")]
    Dot,

    #[token("&")]
    Amp,

    #[token("|")]
    Pipe,

    /// Any character not covered by another token.
    Error,
}
