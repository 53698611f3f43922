//! Symbol extraction: the per-document table of named declarations.
//!
//! Extraction walks the top-level declarations of a [`SyntaxFile`] once.
//! Each named declaration becomes one [`Symbol`]; relation-shaped
//! declarations additionally contribute their forward and reverse role
//! names as independently resolvable symbols.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::TextRange;
use crate::syntax::{DeclarationKind, SyntaxFile};

// ============================================================================
// SYMBOL KIND
// ============================================================================

/// Semantic type of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    // Entities
    Aspect,
    Concept,
    RelationEntity,
    // Relations
    UnreifiedRelation,
    ForwardRelation,
    ReverseRelation,
    // Types
    Scalar,
    Structure,
    // Properties
    ScalarProperty,
    StructuredProperty,
    AnnotationProperty,
    // Instances
    ConceptInstance,
    RelationInstance,
    // Rules
    Rule,
    BuiltIn,
}

impl SymbolKind {
    pub const ALL: &'static [SymbolKind] = &[
        SymbolKind::Aspect,
        SymbolKind::Concept,
        SymbolKind::RelationEntity,
        SymbolKind::UnreifiedRelation,
        SymbolKind::ForwardRelation,
        SymbolKind::ReverseRelation,
        SymbolKind::Scalar,
        SymbolKind::Structure,
        SymbolKind::ScalarProperty,
        SymbolKind::StructuredProperty,
        SymbolKind::AnnotationProperty,
        SymbolKind::ConceptInstance,
        SymbolKind::RelationInstance,
        SymbolKind::Rule,
        SymbolKind::BuiltIn,
    ];

    /// Kinds matched by the `Entity` filter group.
    pub const ENTITIES: &'static [SymbolKind] = &[
        SymbolKind::Aspect,
        SymbolKind::Concept,
        SymbolKind::RelationEntity,
    ];

    /// Name used in messages and in filter strings.
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Aspect => "Aspect",
            SymbolKind::Concept => "Concept",
            SymbolKind::RelationEntity => "RelationEntity",
            SymbolKind::UnreifiedRelation => "UnreifiedRelation",
            SymbolKind::ForwardRelation => "ForwardRelation",
            SymbolKind::ReverseRelation => "ReverseRelation",
            SymbolKind::Scalar => "Scalar",
            SymbolKind::Structure => "Structure",
            SymbolKind::ScalarProperty => "ScalarProperty",
            SymbolKind::StructuredProperty => "StructuredProperty",
            SymbolKind::AnnotationProperty => "AnnotationProperty",
            SymbolKind::ConceptInstance => "ConceptInstance",
            SymbolKind::RelationInstance => "RelationInstance",
            SymbolKind::Rule => "Rule",
            SymbolKind::BuiltIn => "BuiltIn",
        }
    }

    pub fn is_entity(self) -> bool {
        Self::ENTITIES.contains(&self)
    }

    /// True for synthesized forward/reverse role symbols.
    pub fn is_role(self) -> bool {
        matches!(self, SymbolKind::ForwardRelation | SymbolKind::ReverseRelation)
    }
}

impl From<DeclarationKind> for SymbolKind {
    fn from(kind: DeclarationKind) -> Self {
        match kind {
            DeclarationKind::Aspect => SymbolKind::Aspect,
            DeclarationKind::Concept => SymbolKind::Concept,
            DeclarationKind::RelationEntity => SymbolKind::RelationEntity,
            DeclarationKind::UnreifiedRelation => SymbolKind::UnreifiedRelation,
            DeclarationKind::Scalar => SymbolKind::Scalar,
            DeclarationKind::Structure => SymbolKind::Structure,
            DeclarationKind::ScalarProperty => SymbolKind::ScalarProperty,
            DeclarationKind::StructuredProperty => SymbolKind::StructuredProperty,
            DeclarationKind::AnnotationProperty => SymbolKind::AnnotationProperty,
            DeclarationKind::ConceptInstance => SymbolKind::ConceptInstance,
            DeclarationKind::RelationInstance => SymbolKind::RelationInstance,
            DeclarationKind::Rule => SymbolKind::Rule,
            DeclarationKind::BuiltIn => SymbolKind::BuiltIn,
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a kind name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown symbol kind '{0}'")]
pub struct UnknownKind(pub String);

impl FromStr for SymbolKind {
    type Err = UnknownKind;

    /// Case-insensitive; accepts `RelationEntity`, `relation_entity` and `relation-entity`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        SymbolKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str().to_lowercase() == wanted)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

// ============================================================================
// SYMBOL TABLE
// ============================================================================

/// A named declaration inside one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: SmolStr,
    pub kind: SymbolKind,
    pub range: Option<TextRange>,
    /// For role symbols, the name of the relation declaring the role.
    pub parent: Option<SmolStr>,
}

/// All symbols declared by one document, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: IndexMap<SmolStr, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a symbol, keeping the first one when the name is already taken.
    ///
    /// Returns `false` if the name was a duplicate.
    pub fn insert(&mut self, symbol: Symbol) -> bool {
        if self.symbols.contains_key(&symbol.name) {
            tracing::debug!(name = %symbol.name, "duplicate symbol name ignored");
            return false;
        }
        self.symbols.insert(symbol.name.clone(), symbol);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn of_kind(&self, kind: SymbolKind) -> impl Iterator<Item = &Symbol> {
        self.symbols.values().filter(move |s| s.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Build the symbol table of a parsed document.
pub fn extract_symbols(file: &SyntaxFile) -> SymbolTable {
    let mut table = SymbolTable::new();
    for decl in &file.declarations {
        let Some(name) = &decl.name else {
            continue;
        };
        table.insert(Symbol {
            name: name.clone(),
            kind: decl.kind.into(),
            range: decl.name_range,
            parent: None,
        });

        if !decl.kind.has_roles() {
            continue;
        }
        for (role, kind) in [
            (&decl.forward, SymbolKind::ForwardRelation),
            (&decl.reverse, SymbolKind::ReverseRelation),
        ] {
            if let Some(role) = role {
                table.insert(Symbol {
                    name: role.name.clone(),
                    kind,
                    range: Some(role.range),
                    parent: Some(name.clone()),
                });
            }
        }
    }
    table
}
