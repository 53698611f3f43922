//! Reserved words of the document language and the `^` escape convention.
//!
//! An identifier that collides with a reserved word must be written with a
//! leading `^` (e.g. `^concept`). Prefixes and aliases are stored as written;
//! use [`unescape`] before comparing them and [`escape`] before emitting them.

/// Escape marker for identifiers that collide with reserved words.
pub const ESCAPE_MARKER: char = '^';

/// Every reserved word, sorted for binary search.
pub const RESERVED_WORDS: &[&str] = &[
    "all",
    "annotation",
    "as",
    "aspect",
    "asymmetric",
    "builtin",
    "bundle",
    "concept",
    "description",
    "differentFrom",
    "domain",
    "entity",
    "enumerated",
    "extends",
    "false",
    "forward",
    "from",
    "functional",
    "includes",
    "instance",
    "inverse",
    "irreflexive",
    "key",
    "property",
    "range",
    "ref",
    "reflexive",
    "relation",
    "restricts",
    "reverse",
    "rule",
    "sameAs",
    "scalar",
    "self",
    "some",
    "structure",
    "structured",
    "symmetric",
    "to",
    "transitive",
    "true",
    "uses",
    "vocabulary",
];

pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.binary_search(&word).is_ok()
}

/// Strip the escape marker, if any.
pub fn unescape(name: &str) -> &str {
    name.strip_prefix(ESCAPE_MARKER).unwrap_or(name)
}

/// Prefix `name` with the escape marker when it collides with a reserved word.
pub fn escape(name: &str) -> String {
    let bare = unescape(name);
    if is_reserved(bare) {
        format!("{ESCAPE_MARKER}{bare}")
    } else {
        bare.to_string()
    }
}

/// True if `name`, ignoring a leading escape marker, is a valid identifier.
///
/// The lexer uses this to accept non-ASCII identifiers.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = unescape(name).chars();
    match chars.next() {
        Some(first) if first == '_' || unicode_ident::is_xid_start(first) => {}
        _ => return false,
    }
    chars.all(|c| c == '-' || unicode_ident::is_xid_continue(c))
}
