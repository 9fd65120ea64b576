//! go.mod snapshot structures

use serde::Serialize;

/// A decoded go.mod snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Manifest {
    /// Module path, the namespace root of every project-owned package
    pub module: String,
    /// Value of the `go` directive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub go_version: Option<String>,
    /// `require` entries in declaration order
    pub requirements: Vec<Requirement>,
    /// `replace` directives
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replaces: Vec<Replace>,
    /// `exclude` directives
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<ModuleVersion>,
    /// `tool` directives
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
}

/// A single `require` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    /// Module path
    pub path: String,
    /// Pinned version
    pub version: String,
    /// Marked `// indirect`; metadata only
    pub indirect: bool,
}

/// A module path with an optional version, as used by `exclude` and `replace`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleVersion {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A `replace old => new` directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replace {
    pub old: ModuleVersion,
    pub new: ModuleVersion,
}

impl Manifest {
    /// Creates an empty manifest for the given module path
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            ..Self::default()
        }
    }

    /// Adds a requirement (builder pattern)
    pub fn with_requirement(mut self, path: impl Into<String>, version: impl Into<String>) -> Self {
        self.requirements.push(Requirement::new(path, version));
        self
    }

    /// Looks up a requirement by module path
    pub fn requirement(&self, path: &str) -> Option<&Requirement> {
        self.requirements.iter().find(|r| r.path == path)
    }

    /// Returns true if `import_path` lies in this module's namespace
    pub fn owns(&self, import_path: &str) -> bool {
        match import_path.strip_prefix(self.module.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

impl Requirement {
    /// Creates a direct requirement
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
            indirect: false,
        }
    }

    /// Creates a requirement marked `// indirect`
    pub fn indirect(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            indirect: true,
            ..Self::new(path, version)
        }
    }

    /// Two requirements pin the same thing when path and version agree.
    /// The indirect marker does not take part.
    pub fn same_pin(&self, other: &Requirement) -> bool {
        self.path == other.path && self.version == other.version
    }
}

impl ModuleVersion {
    pub fn new(path: impl Into<String>, version: Option<String>) -> Self {
        Self {
            path: path.into(),
            version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owns_exact_module() {
        let manifest = Manifest::new("example.com/m");
        assert!(manifest.owns("example.com/m"));
    }

    #[test]
    fn test_owns_subpackage() {
        let manifest = Manifest::new("example.com/m");
        assert!(manifest.owns("example.com/m/internal/db"));
    }

    #[test]
    fn test_owns_rejects_sibling_with_shared_prefix() {
        let manifest = Manifest::new("example.com/m");
        assert!(!manifest.owns("example.com/mono/x"));
        assert!(!manifest.owns("github.com/other/lib"));
    }

    #[test]
    fn test_requirement_lookup() {
        let manifest = Manifest::new("m").with_requirement("ext/lib", "v1.0.0");
        assert_eq!(manifest.requirement("ext/lib").unwrap().version, "v1.0.0");
        assert!(manifest.requirement("ext/other").is_none());
    }

    #[test]
    fn test_same_pin_ignores_indirect() {
        let direct = Requirement::new("ext/lib", "v1.0.0");
        let indirect = Requirement::indirect("ext/lib", "v1.0.0");
        assert!(direct.same_pin(&indirect));
        assert!(!direct.same_pin(&Requirement::new("ext/lib", "v1.0.1")));
    }
}
