//! Reconciliation of the three change signals

use crate::domain::{ChangeRecord, ChangeSet, ModuleChange};

/// Merges file, go.mod and module graph changes into one [`ChangeSet`].
///
/// Module changes become single-reason records keyed by module path.
/// Records sharing an identifier have their reasons concatenated in the
/// order given here: files, then go.mod, then module graph.
pub fn reconcile(
    file_changes: Vec<ChangeRecord>,
    requirement_changes: Vec<ModuleChange>,
    resolution_changes: Vec<ModuleChange>,
) -> ChangeSet {
    file_changes
        .into_iter()
        .chain(requirement_changes.into_iter().map(ChangeRecord::requirement))
        .chain(resolution_changes.into_iter().map(ChangeRecord::resolution))
        .collect()
}
