//! Recursive-descent parser for the top-level structure of a document.

use smol_str::SmolStr;

use super::keywords;
use super::lexer::{Token, TokenKind, tokenize};
use crate::base::{LineIndex, TextRange, TextSize};
use crate::syntax::{
    Declaration, DeclarationKind, DocumentHeader, DocumentKind, ImportDecl, ImportKind, ParseError,
    RefRole, RoleDecl, SyntaxDiagnostic, SyntaxFile, TypeRef,
};

/// Parse a whole document.
///
/// Fails only when the header (`vocabulary <iri> as prefix {`) is missing or
/// malformed; every other problem is recorded as a diagnostic.
pub fn parse_document(text: &str) -> Result<SyntaxFile, ParseError> {
    let line_index = LineIndex::new(text);
    let mut parser = Parser::new(tokenize(text), TextSize::of(text));

    let header = match parser.header() {
        Ok(header) => header,
        Err((message, offset)) => {
            return Err(ParseError::new(message, line_index.line_col(offset)));
        }
    };
    parser.body();

    Ok(SyntaxFile::new(
        header,
        parser.imports,
        parser.declarations,
        parser.diagnostics,
        line_index,
    ))
}

type HeaderResult<T> = Result<T, (String, TextSize)>;

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    eof: TextSize,
    imports: Vec<ImportDecl>,
    declarations: Vec<Declaration>,
    diagnostics: Vec<SyntaxDiagnostic>,
}

impl<'a> Parser<'a> {
    fn new(tokens: Vec<Token<'a>>, eof: TextSize) -> Self {
        Self {
            tokens,
            pos: 0,
            eof,
            imports: Vec::new(),
            declarations: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn nth(&self, n: usize) -> Option<&Token<'a>> {
        self.tokens.get(self.pos + n)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == TokenKind::Ident && t.text == keyword)
    }

    fn nth_is_keyword(&self, n: usize, keyword: &str) -> bool {
        self.nth(n)
            .is_some_and(|t| t.kind == TokenKind::Ident && t.text == keyword)
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token<'a>> {
        if self.at(kind) { self.bump() } else { None }
    }

    fn offset(&self) -> TextSize {
        self.peek().map(|t| t.range.start()).unwrap_or(self.eof)
    }

    /// End offset of the most recently consumed token.
    fn last_end(&self) -> TextSize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.range.end())
            .unwrap_or_default()
    }

    fn error(&mut self, message: impl Into<String>, range: TextRange) {
        self.diagnostics.push(SyntaxDiagnostic {
            message: message.into(),
            range,
        });
    }

    // ------------------------------------------------------------------
    // Header
    // ------------------------------------------------------------------

    fn header(&mut self) -> HeaderResult<DocumentHeader> {
        self.annotations();
        let start = self.offset();

        let kind = match self.peek() {
            Some(t) if t.kind == TokenKind::Ident && t.text == "vocabulary" => {
                DocumentKind::Vocabulary
            }
            Some(t) if t.kind == TokenKind::Ident && t.text == "description" => {
                DocumentKind::Description
            }
            _ => {
                return Err((
                    "expected 'vocabulary' or 'description' at start of document".to_string(),
                    start,
                ));
            }
        };
        self.bump();
        let kind = if self.at_keyword("bundle") {
            self.bump();
            match kind {
                DocumentKind::Vocabulary => DocumentKind::VocabularyBundle,
                _ => DocumentKind::DescriptionBundle,
            }
        } else {
            kind
        };

        let namespace = match self.eat(TokenKind::Iri) {
            Some(t) => iri_text(t.text),
            None => return Err(("expected namespace IRI".to_string(), self.offset())),
        };
        if self.eat_keyword("as").is_none() {
            return Err(("expected 'as' after namespace".to_string(), self.offset()));
        }
        let prefix = match self.eat(TokenKind::Ident) {
            Some(t) => SmolStr::new(t.text),
            None => return Err(("expected prefix after 'as'".to_string(), self.offset())),
        };
        let brace = match self.eat(TokenKind::LBrace) {
            Some(t) => t,
            None => return Err(("expected '{' after prefix".to_string(), self.offset())),
        };

        Ok(DocumentHeader {
            kind,
            namespace,
            prefix,
            range: TextRange::new(start, brace.range.end()),
            body_start: brace.range.end(),
        })
    }

    fn eat_keyword(&mut self, keyword: &str) -> Option<Token<'a>> {
        if self.at_keyword(keyword) { self.bump() } else { None }
    }

    // ------------------------------------------------------------------
    // Body
    // ------------------------------------------------------------------

    fn body(&mut self) {
        loop {
            let Some(token) = self.peek().copied() else {
                self.error("missing closing '}'", TextRange::empty(self.eof));
                return;
            };
            match token.kind {
                TokenKind::RBrace => {
                    self.bump();
                    if let Some(extra) = self.peek().copied() {
                        self.error("unexpected content after closing '}'", extra.range);
                    }
                    return;
                }
                TokenKind::At => {
                    self.annotations();
                }
                TokenKind::Ident => self.member(token),
                _ => {
                    self.bump();
                    self.error(format!("unexpected '{}'", token.text), token.range);
                }
            }
        }
    }

    fn member(&mut self, token: Token<'a>) {
        if let Some(kind) = ImportKind::from_keyword(token.text) {
            self.import(kind);
            return;
        }
        if token.text == "ref" {
            self.bump();
            self.skip_reference_member();
            return;
        }
        match self.declaration_kind() {
            Some((kind, keyword_len)) => {
                for _ in 0..keyword_len {
                    self.bump();
                }
                self.declaration(kind, token.range.start());
            }
            None => {
                self.bump();
                self.error(format!("unexpected '{}'", token.text), token.range);
            }
        }
    }

    /// Recognise the keyword sequence starting a declaration.
    ///
    /// Returns the kind and the number of keyword tokens to consume.
    fn declaration_kind(&self) -> Option<(DeclarationKind, usize)> {
        let first = self.peek()?.text;
        let kind = match first {
            "aspect" => (DeclarationKind::Aspect, 1),
            "concept" => (DeclarationKind::Concept, 1),
            "structure" => (DeclarationKind::Structure, 1),
            "rule" => (DeclarationKind::Rule, 1),
            "builtin" => (DeclarationKind::BuiltIn, 1),
            "instance" => (DeclarationKind::ConceptInstance, 1),
            "relation" if self.nth_is_keyword(1, "entity") => (DeclarationKind::RelationEntity, 2),
            "relation" if self.nth_is_keyword(1, "instance") => {
                (DeclarationKind::RelationInstance, 2)
            }
            "relation" => (DeclarationKind::UnreifiedRelation, 1),
            "scalar" if self.nth_is_keyword(1, "property") => (DeclarationKind::ScalarProperty, 2),
            "scalar" => (DeclarationKind::Scalar, 1),
            "enumerated" if self.nth_is_keyword(1, "scalar") => (DeclarationKind::Scalar, 2),
            "structured" if self.nth_is_keyword(1, "property") => {
                (DeclarationKind::StructuredProperty, 2)
            }
            "annotation" if self.nth_is_keyword(1, "property") => {
                (DeclarationKind::AnnotationProperty, 2)
            }
            _ => return None,
        };
        Some(kind)
    }

    fn import(&mut self, kind: ImportKind) {
        let start = self.offset();
        self.bump();
        let Some(iri) = self.eat(TokenKind::Iri) else {
            let range = TextRange::new(start, self.last_end());
            self.error(format!("expected namespace IRI after '{}'", kind.keyword()), range);
            return;
        };
        let alias = if self.eat_keyword("as").is_some() {
            match self.eat(TokenKind::Ident) {
                Some(t) => Some(SmolStr::new(t.text)),
                None => {
                    let range = TextRange::new(start, self.last_end());
                    self.error("expected alias after 'as'", range);
                    None
                }
            }
        } else {
            None
        };
        self.imports.push(ImportDecl {
            kind,
            namespace: iri_text(iri.text),
            alias,
            range: TextRange::new(start, self.last_end()),
        });
    }

    fn declaration(&mut self, kind: DeclarationKind, start: TextSize) {
        let mut decl = Declaration::new(kind, TextRange::empty(start));

        if let Some(t) = self.peek().copied()
            && t.kind == TokenKind::Ident
            && !is_member_start(t.text)
        {
            self.bump();
            decl.name = Some(SmolStr::new(keywords::unescape(t.text)));
            decl.name_range = Some(t.range);
        }

        loop {
            let role = if self.eat(TokenKind::Colon).is_some() {
                RefRole::Type
            } else if self.eat(TokenKind::Lt).is_some() {
                RefRole::Specialization
            } else {
                break;
            };
            self.reference_list(role, &mut decl.references);
        }

        // `= expression` forms (scalar ranges, rule heads) are skipped up to the body.
        if self.eat(TokenKind::Eq).is_some() {
            while let Some(t) = self.peek() {
                if matches!(t.kind, TokenKind::LBracket | TokenKind::RBrace)
                    || (t.kind == TokenKind::Ident && is_member_start(t.text))
                {
                    break;
                }
                self.bump();
            }
        }

        if self.at(TokenKind::LBracket) {
            self.declaration_body(&mut decl);
        }

        decl.range = TextRange::new(start, self.last_end().max(start));
        self.declarations.push(decl);
    }

    /// Scan a `[ ... ]` body for role names and references.
    fn declaration_body(&mut self, decl: &mut Declaration) {
        let open = self.bump().map(|t| t.range);
        let mut depth = 1usize;
        while depth > 0 {
            let Some(token) = self.bump() else {
                let range = open.unwrap_or_else(|| TextRange::empty(self.eof));
                self.error("unclosed '['", range);
                return;
            };
            match token.kind {
                TokenKind::LBracket => depth += 1,
                TokenKind::RBracket => depth -= 1,
                TokenKind::Ident if depth == 1 => match token.text {
                    "forward" | "reverse" if decl.kind.has_roles() => {
                        if let Some(name) = self.eat(TokenKind::Ident) {
                            let role = RoleDecl {
                                name: SmolStr::new(keywords::unescape(name.text)),
                                range: name.range,
                            };
                            if token.text == "forward" {
                                decl.forward = Some(role);
                            } else {
                                decl.reverse = Some(role);
                            }
                        }
                    }
                    "from" => self.reference_list(RefRole::Source, &mut decl.references),
                    "to" => self.reference_list(RefRole::Target, &mut decl.references),
                    "domain" => self.reference_list(RefRole::Domain, &mut decl.references),
                    "range" => self.reference_list(RefRole::Range, &mut decl.references),
                    _ => {}
                },
                _ => {}
            }
        }
    }

    /// Parse `name (, name)*` into references.
    fn reference_list(&mut self, role: RefRole, out: &mut Vec<TypeRef>) {
        loop {
            match self.qualified_name() {
                Some((text, range)) => out.push(TypeRef { text, role, range }),
                None => return,
            }
            if self.eat(TokenKind::Comma).is_none() {
                return;
            }
        }
    }

    /// `Ident` or `Ident:Ident` with no whitespace around the colon.
    fn qualified_name(&mut self) -> Option<(SmolStr, TextRange)> {
        let first = self.peek().copied()?;
        if first.kind != TokenKind::Ident || is_member_start(first.text) {
            return None;
        }
        self.bump();
        if let (Some(colon), Some(local)) = (self.peek().copied(), self.nth(1).copied())
            && colon.kind == TokenKind::Colon
            && local.kind == TokenKind::Ident
            && first.touches(&colon)
            && colon.touches(&local)
        {
            self.bump();
            self.bump();
            let text = format!(
                "{}:{}",
                keywords::unescape(first.text),
                keywords::unescape(local.text)
            );
            return Some((
                SmolStr::new(text),
                TextRange::new(first.range.start(), local.range.end()),
            ));
        }
        Some((SmolStr::new(keywords::unescape(first.text)), first.range))
    }

    /// Skip `ref <kind keywords> name ... [ body ]` without recording a symbol.
    fn skip_reference_member(&mut self) {
        if let Some((_, keyword_len)) = self.declaration_kind() {
            for _ in 0..keyword_len {
                self.bump();
            }
        }
        let mut depth = 0usize;
        while let Some(t) = self.peek().copied() {
            match t.kind {
                TokenKind::LBracket => depth += 1,
                TokenKind::RBracket => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.bump();
                        return;
                    }
                }
                TokenKind::RBrace if depth == 0 => return,
                TokenKind::At if depth == 0 => return,
                TokenKind::Ident if depth == 0 && is_member_start(t.text) => return,
                _ => {}
            }
            self.bump();
        }
    }

    /// Skip any number of `@prop value, value` annotations.
    fn annotations(&mut self) {
        while self.eat(TokenKind::At).is_some() {
            if self.qualified_name().is_none() {
                let range = TextRange::empty(self.offset());
                self.error("expected annotation property after '@'", range);
                continue;
            }
            loop {
                let Some(t) = self.peek().copied() else { return };
                match t.kind {
                    TokenKind::String | TokenKind::Number | TokenKind::Iri => {
                        self.bump();
                        if self.eat(TokenKind::CaretCaret).is_some() {
                            self.qualified_name();
                        }
                    }
                    TokenKind::Ident if !is_member_start(t.text) => {
                        self.qualified_name();
                    }
                    _ => break,
                }
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
    }
}

/// Words that can start a member; never consumed as names.
fn is_member_start(word: &str) -> bool {
    matches!(
        word,
        "aspect"
            | "concept"
            | "relation"
            | "scalar"
            | "enumerated"
            | "structure"
            | "structured"
            | "annotation"
            | "rule"
            | "builtin"
            | "instance"
            | "ref"
            | "extends"
            | "uses"
            | "includes"
            | "vocabulary"
            | "description"
    )
}

fn iri_text(token: &str) -> SmolStr {
    SmolStr::new(
        token
            .strip_prefix('<')
            .and_then(|s| s.strip_suffix('>'))
            .unwrap_or(token),
    )
}
