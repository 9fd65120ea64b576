//! Mapping of changed source files to their owning units

use crate::domain::{ChangeReason, ChangeRecord, Unit};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Index from absolute source file path to owning unit
#[derive(Debug, Default)]
pub struct FileIndex<'a> {
    owners: HashMap<&'a Path, &'a str>,
}

impl<'a> FileIndex<'a> {
    /// Indexes every source file of the inventory
    pub fn new(units: &'a [Unit]) -> Self {
        let owners = units
            .iter()
            .flat_map(|unit| {
                unit.files
                    .iter()
                    .map(move |file| (file.as_path(), unit.import_path.as_str()))
            })
            .collect();
        Self { owners }
    }

    /// Unit owning `file`, if any
    pub fn owner(&self, file: &Path) -> Option<&'a str> {
        self.owners.get(file).copied()
    }

    /// One record per unit touched by `changed_files`, in order of first
    /// encounter, with one reason per matching file.
    ///
    /// Files outside the inventory (build scripts, deleted files, generated
    /// output) are skipped.
    pub fn changes_for(&self, changed_files: &[PathBuf]) -> Vec<ChangeRecord> {
        let mut records: Vec<ChangeRecord> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for file in changed_files {
            let Some(owner) = self.owner(file) else {
                continue;
            };
            let reason = ChangeReason::FileChanged { path: file.clone() };

            match positions.get(owner) {
                Some(&index) => records[index].reasons.push(reason),
                None => {
                    positions.insert(owner, records.len());
                    records.push(ChangeRecord::new(owner, reason));
                }
            }
        }

        records
    }
}
