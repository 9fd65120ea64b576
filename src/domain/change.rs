//! Change records produced by the three change signals

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// A module whose pinned version moved between baseline and current
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleChange {
    /// Module path
    pub path: String,
    /// Baseline version, `None` when the module is new
    pub from: Option<String>,
    /// Current version
    pub to: String,
}

/// Why an identifier is considered changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeReason {
    /// A source file of the unit was edited
    FileChanged { path: PathBuf },
    /// A go.mod requirement was added or re-pinned
    RequirementChanged(ModuleChange),
    /// The module graph resolves the dependency to a different version
    ResolutionChanged(ModuleChange),
}

/// An identifier together with every reason it changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRecord {
    /// Unit import path or module path
    pub id: String,
    /// Reasons in first-seen order, never empty
    pub reasons: Vec<ChangeReason>,
}

/// Reconciled change records keyed by identifier.
///
/// Holds at most one record per identifier; reasons accumulate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    records: BTreeMap<String, ChangeRecord>,
}

impl ModuleChange {
    pub fn new(path: impl Into<String>, from: Option<String>, to: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            from,
            to: to.into(),
        }
    }

    fn describe_versions(&self) -> String {
        match &self.from {
            Some(from) => format!("{} -> {}", from, self.to),
            None => format!("added at {}", self.to),
        }
    }
}

impl fmt::Display for ChangeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeReason::FileChanged { path } => {
                write!(f, "file {} has changed", path.display())
            }
            ChangeReason::RequirementChanged(change) => write!(
                f,
                "module {} has changed in go.mod ({})",
                change.path,
                change.describe_versions()
            ),
            ChangeReason::ResolutionChanged(change) => write!(
                f,
                "dependency {} has changed in the module graph ({})",
                change.path,
                change.describe_versions()
            ),
        }
    }
}

impl Serialize for ChangeReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl ChangeRecord {
    /// Creates a record with a single reason
    pub fn new(id: impl Into<String>, reason: ChangeReason) -> Self {
        Self {
            id: id.into(),
            reasons: vec![reason],
        }
    }

    /// Wraps a go.mod requirement change
    pub fn requirement(change: ModuleChange) -> Self {
        Self::new(change.path.clone(), ChangeReason::RequirementChanged(change))
    }

    /// Wraps a module graph resolution change
    pub fn resolution(change: ModuleChange) -> Self {
        Self::new(change.path.clone(), ChangeReason::ResolutionChanged(change))
    }
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a record into the set, appending its reasons to any existing
    /// record with the same identifier
    pub fn absorb(&mut self, record: ChangeRecord) {
        match self.records.get_mut(&record.id) {
            Some(existing) => existing.reasons.extend(record.reasons),
            None => {
                self.records.insert(record.id.clone(), record);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&ChangeRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Changed identifiers
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn records(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<ChangeRecord> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = ChangeRecord>>(iter: I) -> Self {
        let mut set = ChangeSet::new();
        for record in iter {
            set.absorb(record);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> ChangeReason {
        ChangeReason::FileChanged {
            path: PathBuf::from(path),
        }
    }

    #[test]
    fn test_reason_display_file() {
        assert_eq!(file("/repo/a/a.go").to_string(), "file /repo/a/a.go has changed");
    }

    #[test]
    fn test_reason_display_requirement() {
        let reason = ChangeReason::RequirementChanged(ModuleChange::new(
            "ext/lib",
            Some("v1.0.0".to_string()),
            "v1.1.0",
        ));
        assert_eq!(
            reason.to_string(),
            "module ext/lib has changed in go.mod (v1.0.0 -> v1.1.0)"
        );
    }

    #[test]
    fn test_reason_display_added_resolution() {
        let reason = ChangeReason::ResolutionChanged(ModuleChange::new("ext/new", None, "v0.2.0"));
        assert_eq!(
            reason.to_string(),
            "dependency ext/new has changed in the module graph (added at v0.2.0)"
        );
    }

    #[test]
    fn test_absorb_concatenates_reasons() {
        let mut set = ChangeSet::new();
        set.absorb(ChangeRecord::new("m/a", file("/a.go")));
        set.absorb(ChangeRecord::new("m/a", file("/b.go")));

        assert_eq!(set.len(), 1);
        assert_eq!(set.get("m/a").unwrap().reasons, vec![file("/a.go"), file("/b.go")]);
    }

    #[test]
    fn test_from_iterator() {
        let set: ChangeSet = vec![
            ChangeRecord::new("m/b", file("/b.go")),
            ChangeRecord::new("m/a", file("/a.go")),
        ]
        .into_iter()
        .collect();

        assert!(set.contains("m/a"));
        assert!(set.contains("m/b"));
        assert!(!set.contains("m/c"));
    }

    #[test]
    fn test_reason_serializes_as_text() {
        let json = serde_json::to_string(&file("/a.go")).unwrap();
        assert_eq!(json, "\"file /a.go has changed\"");
    }
}
