#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use omlscope::KindFilter;
use omlscope::base::constants::CONFIG_FILE_NAME;
use omlscope::project::{Discoverer, DiscoverySource};

use crate::helpers::fixtures::{a_and_b, vocabulary};
use crate::helpers::workspace::TestWorkspace;

fn scenario() -> TestWorkspace {
    let ws = TestWorkspace::new();
    for (name, text) in a_and_b() {
        ws.write(name, &text);
    }
    ws
}

#[tokio::test]
async fn test_scan_skips_build_and_hidden_directories() {
    let ws = scenario()
        .with_file("target/Copy.oml", &vocabulary("ns:t", "t", &["concept Foo"]))
        .with_file(".history/Old.oml", &vocabulary("ns:h", "h", &["concept Foo"]));

    let documents = Discoverer::new(&ws.config())
        .list_candidate_documents()
        .await
        .unwrap();
    assert_eq!(documents, vec![ws.path("A.oml"), ws.path("B.oml")]);

    // The copies are invisible, so `Foo` stays unique.
    let output = ws
        .host()
        .resolve("Foo", &ws.path("B.oml"), &KindFilter::Any)
        .await
        .unwrap();
    assert!(output.result.is_found());
}

#[tokio::test]
async fn test_config_file_is_honoured() {
    let ws = scenario()
        .with_file("generated/G.oml", &vocabulary("ns:g", "g", &["concept Foo"]))
        .with_file(CONFIG_FILE_NAME, "ignore = [\"generated\"]\ncache-capacity = 2\n");

    let host = omlscope::AnalysisHost::open(ws.root()).unwrap();
    assert_eq!(host.config().cache_capacity, 2);
    let snapshot = host.load_workspace().await.unwrap();
    assert_eq!(snapshot.documents.len(), 2);
    assert!(host.cache().len() <= 2);
}

#[tokio::test]
async fn test_unreachable_index_falls_back_to_scan() {
    let ws = scenario();
    let config = ws
        .config()
        .with_index_socket(ws.path("nobody-listens.sock"))
        .with_index_timeout(Duration::from_millis(200));
    let discovered = Discoverer::new(&config).discover().await.unwrap();
    assert_eq!(discovered.source, DiscoverySource::FilesystemScan);
    assert_eq!(discovered.documents.len(), 2);
}

#[cfg(unix)]
#[tokio::test]
async fn test_live_index_limits_the_workspace() {
    use futures::{SinkExt, StreamExt};
    use tokio::net::UnixListener;
    use tokio_util::bytes::Bytes;
    use tokio_util::codec::{Framed, LengthDelimitedCodec};

    let ws = scenario().with_file("C.oml", &vocabulary("ns:c", "c", &["concept Foo"]));
    let socket = ws.path("index.sock");
    let listener = UnixListener::bind(&socket).unwrap();
    let listed = vec![
        url::Url::from_file_path(ws.path("A.oml")).unwrap().to_string(),
        url::Url::from_file_path(ws.path("B.oml")).unwrap().to_string(),
    ];
    tokio::spawn(async move {
        loop {
            let (stream, _) = listener.accept().await.unwrap();
            let mut framed = Framed::new(stream, LengthDelimitedCodec::new());
            let Some(Ok(frame)) = framed.next().await else {
                continue;
            };
            let request: serde_json::Value = serde_json::from_slice(&frame).unwrap();
            let reply = serde_json::json!({ "id": request["id"], "result": listed });
            framed.send(Bytes::from(reply.to_string())).await.unwrap();
        }
    });

    let host = omlscope::AnalysisHost::new(ws.config().with_index_socket(&socket));
    let discovered = host.discoverer().discover().await.unwrap();
    assert_eq!(discovered.source, DiscoverySource::LiveIndex);
    assert_eq!(discovered.documents, vec![ws.path("A.oml"), ws.path("B.oml")]);

    // C.oml is not indexed, so its `Foo` does not make the name ambiguous.
    let output = host
        .resolve("Foo", &ws.path("B.oml"), &KindFilter::Any)
        .await
        .unwrap();
    assert_eq!(output.result.resolution().unwrap().qualified_name, "a:Foo");
}
