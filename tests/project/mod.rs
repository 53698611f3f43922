//! Discovery and configuration tests through the public API.

pub mod tests_discovery;
