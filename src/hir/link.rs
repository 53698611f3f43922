//! Links from references to the symbols they name.

use std::fmt;
use std::path::PathBuf;

use smol_str::SmolStr;

use super::symbols::SymbolKind;
use crate::syntax::TypeRef;

/// Identifies a symbol by owning document and local name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolHandle {
    pub document: PathBuf,
    pub namespace: SmolStr,
    pub name: SmolStr,
    pub kind: SymbolKind,
}

impl fmt::Display for SymbolHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.namespace, self.name)
    }
}

/// A reference that is either still textual or bound to a symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    Unresolved(SmolStr),
    Resolved(SymbolHandle),
}

impl Link {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Link::Resolved(_))
    }

    pub fn target(&self) -> Option<&SymbolHandle> {
        match self {
            Link::Resolved(handle) => Some(handle),
            Link::Unresolved(_) => None,
        }
    }
}

/// The outcome of linking one reference of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedReference {
    /// Name of the declaration holding the reference, if it has one.
    pub declaration: Option<SmolStr>,
    pub reference: TypeRef,
    pub link: Link,
    /// Why the reference stayed unresolved.
    pub failure: Option<String>,
}
