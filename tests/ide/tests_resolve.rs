#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use omlscope::hir::Severity;
use omlscope::{KindFilter, ResolveResult, SymbolKind, WorkspaceError};
use rstest::rstest;

use crate::helpers::fixtures::{a_and_b, vocabulary};
use crate::helpers::parsers::PanickingParser;
use crate::helpers::workspace::TestWorkspace;

fn scenario() -> TestWorkspace {
    let ws = TestWorkspace::new();
    for (name, text) in a_and_b() {
        ws.write(name, &text);
    }
    ws
}

async fn resolve(ws: &TestWorkspace, name: &str, context: &str) -> ResolveResult {
    ws.host()
        .resolve(name, &ws.path(context), &KindFilter::Any)
        .await
        .unwrap()
        .result
}

#[tokio::test]
async fn test_local_name_resolves_bare() {
    let ws = scenario();
    let found = resolve(&ws, "Foo", "A.oml").await;
    let found = found.resolution().unwrap();
    assert_eq!(found.qualified_name, "Foo");
    assert_eq!(found.prefix, None);
    assert!(!found.needs_import);
    assert_eq!(found.import_namespace, None);
}

#[tokio::test]
async fn test_imported_name_uses_import_alias() {
    let ws = scenario();
    let found = resolve(&ws, "Foo", "B.oml").await;
    let found = found.resolution().unwrap();
    assert_eq!(found.qualified_name, "a:Foo");
    assert!(!found.needs_import);
    assert_eq!(found.document, ws.path("A.oml"));
}

#[tokio::test]
async fn test_unimported_name_needs_import() {
    let ws = scenario();
    let found = resolve(&ws, "Bar", "A.oml").await;
    let found = found.resolution().unwrap();
    assert_eq!(found.qualified_name, "b:Bar");
    assert!(found.needs_import);
    assert_eq!(found.import_namespace.as_deref(), Some("ns:b"));
}

#[tokio::test]
async fn test_custom_import_alias_is_used() {
    let ws = scenario().with_file(
        "C.oml",
        &vocabulary("ns:c", "c", &["extends <ns:a> as base", "concept Baz"]),
    );
    let found = resolve(&ws, "Foo", "C.oml").await;
    assert_eq!(found.resolution().unwrap().qualified_name, "base:Foo");
}

#[tokio::test]
async fn test_qualified_name_keeps_callers_prefix() {
    let ws = scenario();
    let found = resolve(&ws, "mine:Bar", "A.oml").await;
    let found = found.resolution().unwrap();
    assert_eq!(found.qualified_name, "mine:Bar");
    assert_eq!(found.prefix.as_deref(), Some("mine"));
    assert!(found.needs_import);
    assert_eq!(found.import_namespace.as_deref(), Some("ns:b"));
}

#[tokio::test]
async fn test_qualified_missing_name_is_not_found() {
    let ws = scenario();
    let result = resolve(&ws, "b:Nope", "A.oml").await;
    assert!(matches!(result, ResolveResult::NotFound { .. }));
    assert!(result.reason().unwrap().contains("workspace discovery"));
}

#[tokio::test]
async fn test_ambiguous_candidates_are_ranked() {
    let ws = scenario()
        .with_file("C.oml", &vocabulary("ns:c", "c", &["concept Dup"]))
        .with_file("D.oml", &vocabulary("ns:d", "d", &["concept Dup"]))
        .with_file(
            "E.oml",
            &vocabulary("ns:e", "e", &["extends <ns:d> as d", "concept Dup"]),
        );

    let result = resolve(&ws, "Dup", "E.oml").await;
    assert!(result.is_ambiguous());
    let names: Vec<_> = result
        .candidates()
        .iter()
        .map(|c| c.qualified_name.as_str())
        .collect();
    assert_eq!(names, vec!["Dup", "d:Dup", "c:Dup"]);
    assert_eq!(result.candidates()[1].path, ws.path("D.oml"));

    // The ordering is reproducible.
    for _ in 0..3 {
        assert_eq!(resolve(&ws, "Dup", "E.oml").await, result);
    }
}

#[tokio::test]
async fn test_unrelated_candidates_sort_by_alias() {
    let ws = scenario()
        .with_file("z.oml", &vocabulary("ns:z", "zeta", &["concept Dup"]))
        .with_file("y.oml", &vocabulary("ns:y", "alpha", &["concept Dup"]));
    let result = resolve(&ws, "Dup", "A.oml").await;
    let names: Vec<_> = result
        .candidates()
        .iter()
        .map(|c| c.qualified_name.as_str())
        .collect();
    assert_eq!(names, vec!["alpha:Dup", "zeta:Dup"]);
}

#[rstest]
#[case(&["concept"], SymbolKind::Concept)]
#[case(&["aspect"], SymbolKind::Aspect)]
#[case(&["scalar-property"], SymbolKind::ScalarProperty)]
#[tokio::test]
async fn test_kind_filter_selects_one_of_many(#[case] kinds: &[&str], #[case] expected: SymbolKind) {
    let ws = TestWorkspace::new()
        .with_file("c.oml", &vocabulary("ns:c", "c", &["concept Shared"]))
        .with_file("d.oml", &vocabulary("ns:d", "d", &["aspect Shared"]))
        .with_file(
            "e.oml",
            &vocabulary("ns:e", "e", &["scalar property Shared [ domain x:Y range string ]"]),
        )
        .with_file("ctx.oml", &vocabulary("ns:ctx", "ctx", &[]));

    let filter = KindFilter::parse(kinds).unwrap();
    let output = ws
        .host()
        .resolve("Shared", &ws.path("ctx.oml"), &filter)
        .await
        .unwrap();
    assert_eq!(output.result.resolution().unwrap().kind, expected);
}

#[tokio::test]
async fn test_entity_filter_excludes_properties() {
    let ws = TestWorkspace::new()
        .with_file("c.oml", &vocabulary("ns:c", "c", &["concept Shared"]))
        .with_file(
            "e.oml",
            &vocabulary("ns:e", "e", &["scalar property Shared [ domain x:Y range string ]"]),
        );
    let output = ws
        .host()
        .resolve("Shared", &ws.path("c.oml"), &KindFilter::entity())
        .await
        .unwrap();
    assert_eq!(output.result.resolution().unwrap().qualified_name, "Shared");
}

#[tokio::test]
async fn test_filter_mismatch_is_not_found() {
    let ws = scenario();
    let filter = KindFilter::only([SymbolKind::Aspect]);
    let output = ws
        .host()
        .resolve("Foo", &ws.path("B.oml"), &filter)
        .await
        .unwrap();
    assert!(matches!(output.result, ResolveResult::NotFound { .. }));
    assert!(output.result.reason().unwrap().contains("Aspect"));
}

#[tokio::test]
async fn test_relation_roles_resolve() {
    let ws = scenario().with_file(
        "R.oml",
        &vocabulary(
            "ns:r",
            "r",
            &["relation entity Owns [ from a:Foo to a:Foo forward owns reverse isOwnedBy ]"],
        ),
    );
    let found = resolve(&ws, "isOwnedBy", "A.oml").await;
    let found = found.resolution().unwrap();
    assert_eq!(found.kind, SymbolKind::ReverseRelation);
    assert_eq!(found.qualified_name, "r:isOwnedBy");
}

#[tokio::test]
async fn test_broken_documents_are_skipped_with_diagnostics() {
    let ws = scenario().with_file("broken.oml", "this is not a document");
    let output = ws
        .host()
        .resolve("Foo", &ws.path("B.oml"), &KindFilter::Any)
        .await
        .unwrap();
    assert!(output.result.is_found());
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].severity, Severity::Warning);
    assert_eq!(output.diagnostics[0].path, ws.path("broken.oml"));
}

#[tokio::test]
async fn test_crashed_load_is_reported_as_skipped() {
    let ws = scenario().with_file("P.oml", &vocabulary("ns:p", "p", &["concept Poison"]));
    let host = ws.host_with_parser(Arc::new(PanickingParser {
        trigger: "concept Poison",
    }));

    let output = host
        .resolve("Foo", &ws.path("B.oml"), &KindFilter::Any)
        .await
        .unwrap();
    assert!(output.result.is_found());
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].path, ws.path("P.oml"));
    assert!(output.diagnostics[0].message.contains("document skipped"));
}

#[tokio::test]
async fn test_broken_context_is_an_error() {
    let ws = scenario().with_file("broken.oml", "this is not a document");
    let err = ws
        .host()
        .resolve("Foo", &ws.path("broken.oml"), &KindFilter::Any)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkspaceError::Parse { .. }));
}

#[tokio::test]
async fn test_missing_context_is_an_error() {
    let ws = scenario();
    let err = ws
        .host()
        .resolve("Foo", &ws.path("missing.oml"), &KindFilter::Any)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_context_outside_workspace_root_is_searched() {
    let ws = TestWorkspace::new()
        .with_file("root/A.oml", &vocabulary("ns:a", "a", &["concept Foo"]))
        .with_file("outside.oml", &vocabulary("ns:o", "o", &["concept Local"]));
    let host = omlscope::AnalysisHost::new(omlscope::WorkspaceConfig::new(ws.path("root")));

    let local = host
        .resolve("Local", &ws.path("outside.oml"), &KindFilter::Any)
        .await
        .unwrap();
    assert_eq!(local.result.resolution().unwrap().qualified_name, "Local");

    let remote = host
        .resolve("Foo", &ws.path("outside.oml"), &KindFilter::Any)
        .await
        .unwrap();
    assert_eq!(remote.result.resolution().unwrap().qualified_name, "a:Foo");
}

#[tokio::test]
async fn test_edited_document_is_seen_by_next_resolution() {
    let ws = scenario();
    let host = ws.host();
    let before = host
        .resolve("Foo", &ws.path("B.oml"), &KindFilter::Any)
        .await
        .unwrap();
    assert!(before.result.is_found());

    ws.rewrite("A.oml", &vocabulary("ns:a", "a", &["concept Renamed"]));
    let after = host
        .resolve("Foo", &ws.path("B.oml"), &KindFilter::Any)
        .await
        .unwrap();
    assert!(matches!(after.result, ResolveResult::NotFound { .. }));
}

#[tokio::test]
async fn test_batch_reports_every_failure() {
    let ws = scenario().with_file("C.oml", &vocabulary("ns:c", "c", &["concept Foo"]));
    let output = ws
        .host()
        .resolve_batch(&["Bar", "Nope", "Foo"], &ws.path("A.oml"), &KindFilter::Any)
        .await
        .unwrap();
    let batch = output.result;
    assert_eq!(batch.resolved.len(), 1);
    assert_eq!(batch.resolved[0].0, "Bar");
    // A's own `Foo` and C's `Foo` both match, so `Foo` stays ambiguous.
    let failed: Vec<_> = batch.failures.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(failed, vec!["Nope", "Foo"]);
    assert_eq!(batch.failures[1].candidates.len(), 2);

    let err = batch.into_result().unwrap_err();
    assert_eq!(err.failures.len(), 2);
    assert!(err.to_string().contains("Nope"));
}
