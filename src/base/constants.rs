//! Domain constants: file extension, discovery filters, cache sizing, well-known namespaces.

use std::time::Duration;

/// Extension of documents handled by the default parser.
pub const DOCUMENT_EXTENSION: &str = "oml";

/// Default number of parsed documents kept in the cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 50;

/// Default upper bound on a live-index query before falling back to a scan.
pub const DEFAULT_INDEX_TIMEOUT: Duration = Duration::from_secs(3);

/// Name of the optional per-workspace configuration file.
pub const CONFIG_FILE_NAME: &str = ".omlresolve.toml";

/// Method name sent to the live workspace index.
pub const INDEX_METHOD_DOCUMENTS: &str = "workspace/documents";

/// Build output directories skipped by the filesystem scan.
pub const BUILD_DIRS: &[&str] = &["target", "build", "out", "bin", "dist"];

/// Dependency directories skipped by the filesystem scan.
pub const DEPENDENCY_DIRS: &[&str] = &["node_modules", "vendor", ".gradle"];

/// External namespaces that are never declared inside a workspace.
///
/// Pairs of `(prefix, namespace IRI)`.
pub const WELL_KNOWN_NAMESPACES: &[(&str, &str)] = &[
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("dc", "http://purl.org/dc/elements/1.1/"),
];

/// XML Schema datatypes that may appear bare as a property range.
pub const XSD_DATATYPES: &[&str] = &[
    "string",
    "boolean",
    "decimal",
    "integer",
    "int",
    "long",
    "short",
    "double",
    "float",
    "dateTime",
    "date",
    "time",
    "anyURI",
    "nonNegativeInteger",
    "positiveInteger",
];

/// Look up a well-known namespace by prefix.
pub fn well_known_namespace(prefix: &str) -> Option<&'static str> {
    WELL_KNOWN_NAMESPACES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, ns)| *ns)
}
