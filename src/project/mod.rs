//! Project layer: configuration, the document cache and workspace discovery.
//!
//! Everything here touches the filesystem or the live index; the `hir`
//! layer above consumes loaded [`Document`]s without doing I/O.

mod cache;
mod config;
mod discovery;
mod document;
mod error;
pub mod file_loader;
mod index_client;

pub use cache::DocumentCache;
pub(crate) use cache::modified_time;
pub use config::WorkspaceConfig;
pub use discovery::{Discovered, Discoverer, DiscoverySource};
pub use document::Document;
pub use error::{IndexError, Result, WorkspaceError};
pub use index_client::IndexClient;
