//! Affected unit structures

use serde::Serialize;

/// An identifier in the final affected set
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AffectedUnit {
    /// Unit import path or external module path
    pub import_path: String,
    /// True when the identifier is outside the project's module namespace
    pub indirect: bool,
}

impl AffectedUnit {
    pub fn new(import_path: impl Into<String>, indirect: bool) -> Self {
        Self {
            import_path: import_path.into(),
            indirect,
        }
    }
}
