//! Client for the live workspace index.
//!
//! The index is a separate process listening on a Unix domain socket. Each
//! message is one length-delimited frame (4-byte big-endian length, then a
//! UTF-8 JSON payload):
//!
//! ```text
//! → {"id": 1, "method": "workspace/documents"}
//! ← {"id": 1, "result": ["file:///w/a.oml", "file:///w/b.oml"]}
//! ← {"id": 1, "error": "not ready"}
//! ```
//!
//! Every failure is an [`IndexError`]; callers fall back to a filesystem scan.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::error::IndexError;
use super::file_loader::has_extension;
use crate::base::constants::{DEFAULT_INDEX_TIMEOUT, INDEX_METHOD_DOCUMENTS};

#[derive(Debug, Serialize)]
struct IndexRequest<'a> {
    id: u64,
    method: &'a str,
}

#[derive(Debug, Deserialize)]
struct IndexResponse {
    id: u64,
    #[serde(default)]
    result: Option<Vec<String>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Queries a running index for the documents it knows about.
#[derive(Debug)]
pub struct IndexClient {
    socket: PathBuf,
    timeout: Duration,
    next_id: AtomicU64,
}

impl IndexClient {
    pub fn new(socket: impl Into<PathBuf>) -> Self {
        Self {
            socket: socket.into(),
            timeout: DEFAULT_INDEX_TIMEOUT,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn socket(&self) -> &Path {
        &self.socket
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Canonical paths of indexed documents with the given extension, sorted.
    ///
    /// The whole exchange, connect included, is bounded by the client timeout.
    /// Entries that are not `file:` URIs or no longer exist are dropped.
    pub async fn documents(&self, extension: &str) -> Result<Vec<PathBuf>, IndexError> {
        let uris = tokio::time::timeout(self.timeout, self.query())
            .await
            .map_err(|_| IndexError::Timeout(self.timeout))??;

        let mut paths = Vec::with_capacity(uris.len());
        for uri in &uris {
            let Some(path) = file_path(uri) else {
                tracing::trace!(%uri, "ignoring non-file index entry");
                continue;
            };
            if !has_extension(&path, extension) {
                continue;
            }
            match tokio::fs::canonicalize(&path).await {
                Ok(path) => paths.push(path),
                Err(e) => tracing::debug!(path = %path.display(), error = %e, "indexed document is gone"),
            }
        }
        paths.sort();
        paths.dedup();
        tracing::debug!(
            socket = %self.socket.display(),
            reported = uris.len(),
            kept = paths.len(),
            "live index answered"
        );
        Ok(paths)
    }

    #[cfg(unix)]
    async fn query(&self) -> Result<Vec<String>, IndexError> {
        use futures::{SinkExt, StreamExt};
        use tokio::net::UnixStream;
        use tokio_util::bytes::Bytes;
        use tokio_util::codec::{Framed, LengthDelimitedCodec};

        let stream = UnixStream::connect(&self.socket)
            .await
            .map_err(IndexError::Connect)?;
        let mut framed = Framed::new(stream, LengthDelimitedCodec::new());

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = serde_json::to_vec(&IndexRequest {
            id,
            method: INDEX_METHOD_DOCUMENTS,
        })
        .map_err(|e| IndexError::Protocol(e.to_string()))?;
        framed
            .send(Bytes::from(request))
            .await
            .map_err(IndexError::Connect)?;

        let frame = framed
            .next()
            .await
            .ok_or(IndexError::Closed)?
            .map_err(IndexError::Connect)?;
        decode_response(id, &frame)
    }

    #[cfg(not(unix))]
    async fn query(&self) -> Result<Vec<String>, IndexError> {
        Err(IndexError::Unsupported)
    }
}

fn decode_response(id: u64, frame: &[u8]) -> Result<Vec<String>, IndexError> {
    let response: IndexResponse =
        serde_json::from_slice(frame).map_err(|e| IndexError::Protocol(e.to_string()))?;
    if response.id != id {
        return Err(IndexError::Protocol(format!(
            "response id {} does not match request id {id}",
            response.id
        )));
    }
    if let Some(error) = response.error {
        let message = match error {
            serde_json::Value::String(message) => message,
            other => other.to_string(),
        };
        return Err(IndexError::Remote(message));
    }
    response
        .result
        .ok_or_else(|| IndexError::Protocol("response carries neither result nor error".to_string()))
}

fn file_path(uri: &str) -> Option<PathBuf> {
    let url = Url::parse(uri).ok()?;
    if url.scheme() != "file" {
        return None;
    }
    url.to_file_path().ok()
}
