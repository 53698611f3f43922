//! IDE layer: the query surface used by editing tools.
//!
//! [`AnalysisHost`] drives discovery, loading and resolution for one
//! workspace. The import planner in [`imports`] is pure and can be used on
//! its own to preview an edit.

mod analysis;
pub mod imports;

pub use analysis::{AnalysisHost, EnsureImportsResult, ResolveOutput, WorkspaceSnapshot};
pub use imports::{AddedImport, ImportPlan, NamespaceLookup, TextEdit, plan_imports};
