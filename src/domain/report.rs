//! The per-invocation impact report

use super::{AffectedUnit, ChangeSet, Manifest, Unit};
use crate::impact::PropagationMode;
use std::path::PathBuf;

/// Result of one impact analysis; immutable once assembled
#[derive(Debug, Clone)]
pub struct Report {
    /// Current go.mod
    pub manifest: Manifest,
    /// Changed source files, absolute
    pub changed_files: Vec<PathBuf>,
    /// Full package inventory of the working tree
    pub units: Vec<Unit>,
    /// Reconciled change records
    pub changes: ChangeSet,
    /// Affected identifiers sorted by import path
    pub affected: Vec<AffectedUnit>,
    /// Matching mode the affected set was propagated with
    pub propagation: PropagationMode,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.affected.is_empty()
    }
}
