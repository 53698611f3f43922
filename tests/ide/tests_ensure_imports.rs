#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use omlscope::KindFilter;
use omlscope::syntax::ImportKind;

use crate::helpers::fixtures::{description, vocabulary};
use crate::helpers::parsers::EditingParser;
use crate::helpers::workspace::TestWorkspace;

fn workspace() -> TestWorkspace {
    TestWorkspace::new()
        .with_file("A.oml", &vocabulary("ns:a", "a", &["concept Foo"]))
        .with_file("C.oml", &vocabulary("ns:c", "c", &["concept Baz"]))
}

#[tokio::test]
async fn test_missing_imports_are_written() {
    let ws = workspace().with_file(
        "B.oml",
        &vocabulary("ns:b", "b", &["concept Bar < a:Foo, c:Baz"]),
    );
    let host = ws.host();

    let result = host.ensure_imports(&ws.path("B.oml")).await.unwrap();
    let lines: Vec<_> = result.added.iter().map(|a| a.line.as_str()).collect();
    assert_eq!(lines, vec!["extends <ns:a> as a", "extends <ns:c> as c"]);
    assert!(result.unresolved.is_empty());

    assert_eq!(
        ws.read("B.oml"),
        "vocabulary <ns:b> as b {\n\textends <ns:a> as a\n\textends <ns:c> as c\n\tconcept Bar < a:Foo, c:Baz\n}\n"
    );
}

#[tokio::test]
async fn test_second_run_adds_nothing() {
    let ws = workspace().with_file("B.oml", &vocabulary("ns:b", "b", &["concept Bar < a:Foo"]));
    let host = ws.host();

    let first = host.ensure_imports(&ws.path("B.oml")).await.unwrap();
    assert_eq!(first.added.len(), 1);
    let written = ws.read("B.oml");

    let second = host.ensure_imports(&ws.path("B.oml")).await.unwrap();
    assert!(second.added.is_empty());
    assert_eq!(ws.read("B.oml"), written);
}

#[tokio::test]
async fn test_cache_sees_the_rewritten_document() {
    let ws = workspace().with_file("B.oml", &vocabulary("ns:b", "b", &["concept Bar < a:Foo"]));
    let host = ws.host();

    let before = host
        .resolve("Foo", &ws.path("B.oml"), &KindFilter::Any)
        .await
        .unwrap();
    assert!(before.result.resolution().unwrap().needs_import);

    host.ensure_imports(&ws.path("B.oml")).await.unwrap();

    let after = host
        .resolve("Foo", &ws.path("B.oml"), &KindFilter::Any)
        .await
        .unwrap();
    assert!(!after.result.resolution().unwrap().needs_import);
}

#[tokio::test]
async fn test_unresolved_prefix_does_not_block_others() {
    let ws = workspace().with_file(
        "B.oml",
        &vocabulary("ns:b", "b", &["concept Bar < a:Foo, zz:Ghost"]),
    );
    let result = ws.host().ensure_imports(&ws.path("B.oml")).await.unwrap();
    assert_eq!(result.added.len(), 1);
    assert_eq!(result.added[0].prefix, "a");
    assert_eq!(result.unresolved, vec!["zz"]);
    assert!(ws.read("B.oml").contains("extends <ns:a> as a"));
}

#[tokio::test]
async fn test_description_imports_with_uses_after_existing_imports() {
    let ws = workspace().with_file(
        "D.oml",
        &description(
            "ns:d",
            "d",
            &["uses <ns:a> as a", "instance x : a:Foo", "instance y : c:Baz"],
        ),
    );
    let result = ws.host().ensure_imports(&ws.path("D.oml")).await.unwrap();
    assert_eq!(result.added.len(), 1);
    assert_eq!(result.added[0].kind, ImportKind::Uses);
    assert_eq!(
        ws.read("D.oml"),
        "description <ns:d> as d {\n\tuses <ns:a> as a\n\tuses <ns:c> as c\n\tinstance x : a:Foo\n\tinstance y : c:Baz\n}\n"
    );
}

#[tokio::test]
async fn test_nothing_to_add_leaves_file_untouched() {
    let text = vocabulary("ns:b", "b", &["extends <ns:a> as a", "concept Bar < a:Foo"]);
    let ws = workspace().with_file("B.oml", &text);
    let result = ws.host().ensure_imports(&ws.path("B.oml")).await.unwrap();
    assert!(result.added.is_empty());
    assert_eq!(ws.read("B.oml"), text);
}

#[tokio::test]
async fn test_edit_saved_during_workspace_load_is_kept() {
    let ws = workspace().with_file("B.oml", &vocabulary("ns:b", "b", &["concept Bar < a:Foo"]));
    let edited = vocabulary("ns:b", "b", &["concept Bar < a:Foo", "concept Edited"]);
    let parser = EditingParser::new().on_parse("concept Foo", ws.path("B.oml"), &edited);
    let host = ws.host_with_parser(Arc::new(parser));

    let result = host.ensure_imports(&ws.path("B.oml")).await.unwrap();
    assert_eq!(result.added.len(), 1);
    assert_eq!(
        ws.read("B.oml"),
        vocabulary(
            "ns:b",
            "b",
            &["extends <ns:a> as a", "concept Bar < a:Foo", "concept Edited"]
        )
    );
}

#[tokio::test]
async fn test_edit_saved_while_planning_is_replanned() {
    let ws = workspace().with_file("B.oml", &vocabulary("ns:b", "b", &["concept Bar < a:Foo"]));
    let edited = vocabulary("ns:b", "b", &["concept Bar < a:Foo", "concept Edited"]);
    let later = vocabulary(
        "ns:b",
        "b",
        &["concept Bar < a:Foo", "concept Edited", "concept Later"],
    );
    let parser = EditingParser::new()
        .on_parse("concept Foo", ws.path("B.oml"), &edited)
        .on_parse("concept Edited", ws.path("B.oml"), &later);
    let host = ws.host_with_parser(Arc::new(parser));

    host.ensure_imports(&ws.path("B.oml")).await.unwrap();
    assert_eq!(
        ws.read("B.oml"),
        vocabulary(
            "ns:b",
            "b",
            &[
                "extends <ns:a> as a",
                "concept Bar < a:Foo",
                "concept Edited",
                "concept Later"
            ]
        )
    );
}
