//! Change impact analysis
//!
//! The pure, in-memory half of the pipeline:
//! - Manifest and module graph differs (change signals from dependencies)
//! - File-to-unit mapping (change signals from edited sources)
//! - Reconciliation of all signals into one [`ChangeSet`]
//! - Reverse import graph propagation and report assembly
//!
//! [`ChangeSet`]: crate::domain::ChangeSet

mod assemble;
mod file_map;
mod graph;
mod manifest_diff;
mod reconcile;
mod resolution_diff;

pub use assemble::assemble_affected;
pub use file_map::FileIndex;
pub use graph::{PropagationMode, ReverseGraph};
pub use manifest_diff::diff_manifests;
pub use reconcile::reconcile;
pub use resolution_diff::diff_resolutions;
