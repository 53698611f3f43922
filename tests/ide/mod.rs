//! AnalysisHost tests against on-disk workspaces.

pub mod tests_ensure_imports;
pub mod tests_link;
pub mod tests_resolve;
