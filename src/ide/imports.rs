//! Import synthesis: add the imports a document needs for the prefixes it uses.
//!
//! [`plan_imports`] is pure. It scans the document text for qualified names
//! (`prefix:Local`), drops the prefixes already covered by an import, finds a
//! namespace for each remaining prefix and builds one text edit inserting
//! the missing import lines.
//!
//! Namespace lookup order for a prefix:
//!
//! 1. well-known external namespaces (`xsd`, `rdf`, `rdfs`, `owl`, `dc`)
//! 2. the workspace [`PrefixIndex`]
//! 3. the owner of a local name used with the prefix, when exactly one
//!    namespace declares that name

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use crate::base::constants::{XSD_DATATYPES, well_known_namespace};
use crate::base::{LineCol, TextRange, TextSize};
use crate::hir::{DocumentNamespace, PrefixIndex, SymbolSource};
use crate::parser::{Lexer, TokenKind, keywords};
use crate::syntax::{ImportKind, RefRole, SyntaxFile};

/// Namespace lookups over the whole workspace.
#[derive(Debug, Clone, Default)]
pub struct NamespaceLookup {
    prefixes: PrefixIndex,
    /// Local name → every namespace declaring it.
    owners: FxHashMap<SmolStr, FxHashSet<SmolStr>>,
}

impl NamespaceLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from documents in discovery order; the first declaration of a prefix wins.
    pub fn from_documents<D: SymbolSource>(documents: &[D]) -> Self {
        let mut lookup = Self::new();
        for doc in documents {
            lookup.add(doc);
        }
        lookup
    }

    pub fn add<D: SymbolSource>(&mut self, doc: &D) {
        let ns = doc.namespace();
        self.prefixes.add(ns);
        for symbol in doc.symbols().iter() {
            self.owners
                .entry(symbol.name.clone())
                .or_default()
                .insert(ns.namespace.clone());
        }
    }

    pub fn prefixes(&self) -> &PrefixIndex {
        &self.prefixes
    }

    /// Namespace for `prefix`, given the local names used with it in the text.
    pub fn namespace_for(&self, prefix: &str, local_names: &[SmolStr]) -> Option<SmolStr> {
        if let Some(ns) = well_known_namespace(prefix) {
            return Some(SmolStr::new(ns));
        }
        if let Some(ns) = self.prefixes.namespace_for(prefix) {
            return Some(SmolStr::new(ns));
        }
        local_names.iter().find_map(|name| {
            let owners = self.owners.get(keywords::unescape(name))?;
            match owners.len() {
                1 => owners.iter().next().cloned(),
                _ => None,
            }
        })
    }
}

/// One import line to add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedImport {
    /// Prefix as used in the text, without escape marker.
    pub prefix: SmolStr,
    pub namespace: SmolStr,
    pub kind: ImportKind,
    /// The inserted statement, without indentation or line break.
    pub line: String,
}

/// An insertion into the document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub offset: TextSize,
    pub insert: String,
}

impl TextEdit {
    pub fn apply(&self, text: &str) -> String {
        let at = usize::from(self.offset).min(text.len());
        let mut out = String::with_capacity(text.len() + self.insert.len());
        out.push_str(&text[..at]);
        out.push_str(&self.insert);
        out.push_str(&text[at..]);
        out
    }
}

/// What [`plan_imports`] decided for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportPlan {
    pub added: Vec<AddedImport>,
    /// Used prefixes no namespace could be found for.
    pub unresolved: Vec<SmolStr>,
    /// `None` when nothing needs to be inserted.
    pub edit: Option<TextEdit>,
}

impl ImportPlan {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.unresolved.is_empty()
    }
}

/// Prefixes used in the text, in order of first use, with the local names
/// each one qualifies.
fn used_prefixes(text: &str, file: &SyntaxFile) -> Vec<(SmolStr, Vec<SmolStr>)> {
    let own = keywords::unescape(&file.header.prefix);
    let mut used: Vec<(SmolStr, Vec<SmolStr>)> = Vec::new();
    let mut record = |prefix: &str, local: &str| {
        let prefix = keywords::unescape(prefix);
        if prefix == own {
            return;
        }
        let local = SmolStr::new(keywords::unescape(local));
        match used.iter_mut().find(|(p, _)| p == prefix) {
            Some((_, locals)) => {
                if !locals.contains(&local) {
                    locals.push(local);
                }
            }
            None => used.push((SmolStr::new(prefix), vec![local])),
        }
    };

    let tokens: Vec<_> = Lexer::new(text).collect();
    for window in tokens.windows(3) {
        let [prefix, colon, local] = window else {
            continue;
        };
        if prefix.kind == TokenKind::Ident
            && colon.kind == TokenKind::Colon
            && local.kind == TokenKind::Ident
            && prefix.touches(colon)
            && colon.touches(local)
        {
            record(prefix.text, local.text);
        }
    }

    // A bare XML Schema datatype as a property range implies `xsd`.
    let declared: FxHashSet<&str> = file
        .declarations
        .iter()
        .filter_map(|d| d.name.as_deref())
        .collect();
    for reference in file.declarations.iter().flat_map(|d| &d.references) {
        if reference.role == RefRole::Range
            && reference.split_qualifier().is_none()
            && XSD_DATATYPES.contains(&reference.text.as_str())
            && !declared.contains(reference.text.as_str())
        {
            record("xsd", &reference.text);
        }
    }
    used
}

/// Whether an existing import already provides `prefix`.
fn covered_by_alias(ns: &DocumentNamespace, prefix: &str, prefixes: &PrefixIndex) -> bool {
    ns.imports.iter().any(|import| {
        import
            .effective_alias(prefixes)
            .is_some_and(|alias| keywords::unescape(alias) == prefix)
    })
}

/// Plan the imports missing from `file`, whose source text is `text`.
pub fn plan_imports(file: &SyntaxFile, text: &str, lookup: &NamespaceLookup) -> ImportPlan {
    let ns = DocumentNamespace::from_syntax(file);
    let kind = file.header.kind.default_import_kind();
    let mut plan = ImportPlan::default();
    let mut planned: FxHashSet<SmolStr> = FxHashSet::default();

    for (prefix, locals) in used_prefixes(text, file) {
        if covered_by_alias(&ns, &prefix, lookup.prefixes()) {
            continue;
        }
        let Some(namespace) = lookup.namespace_for(&prefix, &locals) else {
            tracing::debug!(%prefix, "no namespace found for prefix");
            plan.unresolved.push(prefix);
            continue;
        };
        if namespace == ns.namespace || ns.imports_namespace(&namespace) {
            continue;
        }
        if !planned.insert(namespace.clone()) {
            continue;
        }
        let line = format!(
            "{} <{}> as {}",
            kind.keyword(),
            namespace,
            keywords::escape(&prefix)
        );
        tracing::debug!(%prefix, %namespace, "import planned");
        plan.added.push(AddedImport {
            prefix,
            namespace,
            kind,
            line,
        });
    }

    if !plan.added.is_empty() {
        plan.edit = Some(insertion(file, text, &plan.added));
    }
    plan
}

/// Insert after the last import line, or right after the opening brace.
fn insertion(file: &SyntaxFile, text: &str, added: &[AddedImport]) -> TextEdit {
    let index = file.line_index();
    match file.imports.last() {
        Some(last) => {
            let indent = indentation(file, text, last.range.start());
            let lines: String = added
                .iter()
                .map(|a| format!("{indent}{}\n", a.line))
                .collect();
            match index.next_line_start(last.range.end()) {
                Some(offset) => TextEdit {
                    offset,
                    insert: lines,
                },
                None => TextEdit {
                    offset: last.range.end(),
                    insert: format!("\n{}", lines.trim_end_matches('\n')),
                },
            }
        }
        None => {
            let indent = file
                .declarations
                .first()
                .map(|d| indentation(file, text, d.range.start()))
                .filter(|indent| !indent.is_empty())
                .unwrap_or_else(|| "\t".to_string());
            let lines: String = added
                .iter()
                .map(|a| format!("\n{indent}{}", a.line))
                .collect();
            TextEdit {
                offset: file.header.body_start,
                insert: lines,
            }
        }
    }
}

/// Leading whitespace of the line containing `offset`.
fn indentation(file: &SyntaxFile, text: &str, offset: TextSize) -> String {
    let line = file.line_col(offset).line;
    let Some(start) = file.line_index().offset(LineCol { line, col: 0 }) else {
        return String::new();
    };
    let range = TextRange::new(start, offset.max(start));
    text.get(std::ops::Range::<usize>::from(range))
        .map(|prefix| {
            prefix
                .chars()
                .take_while(|c| *c == ' ' || *c == '\t')
                .collect()
        })
        .unwrap_or_default()
}
