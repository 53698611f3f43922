//! Parsed document representation.
//!
//! A [`SyntaxFile`] is the structured view of one document produced by a
//! [`DocumentParser`](super::DocumentParser): the header (kind, namespace,
//! prefix), the import statements, the top-level declarations and the
//! diagnostics collected while recovering from malformed input.

use smol_str::SmolStr;

use crate::base::{LineCol, LineIndex, TextRange, TextSize};

/// The kind of a document, taken from its header keyword(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// `vocabulary`: defines entity, relation and property types.
    Vocabulary,
    /// `vocabulary bundle`: aggregates vocabularies.
    VocabularyBundle,
    /// `description`: defines instances of vocabulary types.
    Description,
    /// `description bundle`: aggregates descriptions.
    DescriptionBundle,
}

impl DocumentKind {
    /// The header keyword text, e.g. `vocabulary bundle`.
    pub fn keyword(self) -> &'static str {
        match self {
            DocumentKind::Vocabulary => "vocabulary",
            DocumentKind::VocabularyBundle => "vocabulary bundle",
            DocumentKind::Description => "description",
            DocumentKind::DescriptionBundle => "description bundle",
        }
    }

    /// The import kind used when a new import is synthesized into a document of this kind.
    pub fn default_import_kind(self) -> ImportKind {
        match self {
            DocumentKind::Vocabulary => ImportKind::Extends,
            DocumentKind::Description => ImportKind::Uses,
            DocumentKind::VocabularyBundle | DocumentKind::DescriptionBundle => {
                ImportKind::Includes
            }
        }
    }
}

/// Kind of an import statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// `extends`: type-level extension.
    Extends,
    /// `uses`: instance-level use.
    Uses,
    /// `includes`: aggregation into a bundle.
    Includes,
}

impl ImportKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ImportKind::Extends => "extends",
            ImportKind::Uses => "uses",
            ImportKind::Includes => "includes",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "extends" => Some(ImportKind::Extends),
            "uses" => Some(ImportKind::Uses),
            "includes" => Some(ImportKind::Includes),
            _ => None,
        }
    }
}

/// Semantic type tag of a top-level declaration as written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Aspect,
    Concept,
    RelationEntity,
    /// A relation declared without reification (`relation R [...]`).
    UnreifiedRelation,
    Scalar,
    Structure,
    ScalarProperty,
    StructuredProperty,
    AnnotationProperty,
    ConceptInstance,
    RelationInstance,
    Rule,
    BuiltIn,
}

impl DeclarationKind {
    /// Whether declarations of this kind may carry forward/reverse role names.
    pub fn has_roles(self) -> bool {
        matches!(
            self,
            DeclarationKind::RelationEntity | DeclarationKind::UnreifiedRelation
        )
    }
}

/// The `vocabulary <iri> as prefix {` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHeader {
    pub kind: DocumentKind,
    /// Namespace IRI without the surrounding angle brackets.
    pub namespace: SmolStr,
    /// Prefix as written, including a leading `^` escape marker if present.
    pub prefix: SmolStr,
    /// Range of the header, from the first keyword to the opening brace.
    pub range: TextRange,
    /// Offset just past the opening `{`.
    pub body_start: TextSize,
}

/// An `extends|uses|includes <iri> (as alias)?` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub kind: ImportKind,
    pub namespace: SmolStr,
    /// Alias as written, including a `^` escape marker if present.
    pub alias: Option<SmolStr>,
    pub range: TextRange,
}

/// A forward or reverse role name of a relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDecl {
    pub name: SmolStr,
    pub range: TextRange,
}

/// Where a name reference appears inside a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefRole {
    /// `instance i : T`
    Type,
    /// `concept C < S`
    Specialization,
    /// `from X`
    Source,
    /// `to X`
    Target,
    /// `domain X`
    Domain,
    /// `range X`
    Range,
}

/// A textual reference to another declaration, unresolved at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Reference text, either `Local` or `prefix:Local`.
    pub text: SmolStr,
    pub role: RefRole,
    pub range: TextRange,
}

impl TypeRef {
    /// The qualifier and local part, if the reference is qualified.
    pub fn split_qualifier(&self) -> Option<(&str, &str)> {
        self.text.split_once(':')
    }
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    /// Declared name, absent for anonymous declarations.
    pub name: Option<SmolStr>,
    pub name_range: Option<TextRange>,
    /// Full range of the declaration including its body.
    pub range: TextRange,
    pub forward: Option<RoleDecl>,
    pub reverse: Option<RoleDecl>,
    pub references: Vec<TypeRef>,
}

impl Declaration {
    pub fn new(kind: DeclarationKind, range: TextRange) -> Self {
        Self {
            kind,
            name: None,
            name_range: None,
            range,
            forward: None,
            reverse: None,
            references: Vec::new(),
        }
    }
}

/// A recoverable problem found while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxDiagnostic {
    pub message: String,
    pub range: TextRange,
}

/// A parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxFile {
    pub header: DocumentHeader,
    pub imports: Vec<ImportDecl>,
    pub declarations: Vec<Declaration>,
    pub diagnostics: Vec<SyntaxDiagnostic>,
    line_index: LineIndex,
}

impl SyntaxFile {
    pub fn new(
        header: DocumentHeader,
        imports: Vec<ImportDecl>,
        declarations: Vec<Declaration>,
        diagnostics: Vec<SyntaxDiagnostic>,
        line_index: LineIndex,
    ) -> Self {
        Self {
            header,
            imports,
            declarations,
            diagnostics,
            line_index,
        }
    }

    /// Source-position map for this document.
    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Line/column of a byte offset in this document.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        self.line_index.line_col(offset)
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}
