#![allow(clippy::unwrap_used, clippy::expect_used)]

use omlscope::SymbolKind;
use omlscope::hir::Link;

use crate::helpers::fixtures::vocabulary;
use crate::helpers::workspace::TestWorkspace;

#[tokio::test]
async fn test_link_document_binds_references() {
    let ws = TestWorkspace::new()
        .with_file("A.oml", &vocabulary("ns:a", "a", &["concept Foo", "aspect Named"]))
        .with_file(
            "B.oml",
            &vocabulary(
                "ns:b",
                "b",
                &["extends <ns:a> as a", "concept Bar < a:Foo, a:Named, Missing"],
            ),
        );

    let output = ws.host().link_document(&ws.path("B.oml")).await.unwrap();
    let links = output.result;
    assert_eq!(links.len(), 3);
    assert!(links.iter().all(|l| l.declaration.as_deref() == Some("Bar")));

    let foo = links[0].link.target().unwrap();
    assert_eq!(foo.name, "Foo");
    assert_eq!(foo.kind, SymbolKind::Concept);
    assert_eq!(foo.document, ws.path("A.oml"));
    assert_eq!(foo.namespace, "ns:a");

    assert_eq!(links[1].link.target().unwrap().kind, SymbolKind::Aspect);

    assert_eq!(links[2].link, Link::Unresolved("Missing".into()));
    assert!(links[2].failure.as_deref().unwrap().contains("Missing"));
}
