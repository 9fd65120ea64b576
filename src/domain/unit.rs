//! Units (packages) of the current working tree

use serde::Serialize;
use std::path::PathBuf;

/// The three import classes reported per package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportClass {
    /// Imports of the package's own source files
    Ordinary,
    /// Imports of in-package `_test.go` files
    Test,
    /// Imports of external `_test` package files
    XTest,
}

/// A package of the current inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unit {
    /// Import path, unique within one inventory
    pub import_path: String,
    /// Owning directory
    pub dir: PathBuf,
    /// Absolute source file paths
    pub files: Vec<PathBuf>,
    /// Ordinary imports
    pub imports: Vec<String>,
    /// Test-internal imports
    pub test_imports: Vec<String>,
    /// Test-external imports
    pub xtest_imports: Vec<String>,
}

impl Unit {
    /// Creates a unit with no files and no imports
    pub fn new(import_path: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            import_path: import_path.into(),
            dir: dir.into(),
            files: Vec::new(),
            imports: Vec::new(),
            test_imports: Vec::new(),
            xtest_imports: Vec::new(),
        }
    }

    /// Adds source files relative to the unit directory (builder pattern)
    pub fn with_files<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dir = self.dir.clone();
        self.files
            .extend(names.into_iter().map(|name| dir.join(name.as_ref())));
        self
    }

    /// Adds imports of the given class (builder pattern)
    pub fn with_imports<I, S>(mut self, class: ImportClass, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let target = match class {
            ImportClass::Ordinary => &mut self.imports,
            ImportClass::Test => &mut self.test_imports,
            ImportClass::XTest => &mut self.xtest_imports,
        };
        target.extend(imports.into_iter().map(Into::into));
        self
    }

    /// All imports across the three classes, in class order
    pub fn all_imports(&self) -> impl Iterator<Item = &str> {
        self.imports
            .iter()
            .chain(&self.test_imports)
            .chain(&self.xtest_imports)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_files_joins_dir() {
        let unit = Unit::new("m/a", "/repo/a").with_files(["a.go", "a_test.go"]);
        assert_eq!(
            unit.files,
            vec![PathBuf::from("/repo/a/a.go"), PathBuf::from("/repo/a/a_test.go")]
        );
    }

    #[test]
    fn test_all_imports_covers_every_class() {
        let unit = Unit::new("m/a", "/repo/a")
            .with_imports(ImportClass::Ordinary, ["fmt"])
            .with_imports(ImportClass::Test, ["testing"])
            .with_imports(ImportClass::XTest, ["m/a"]);
        let imports: Vec<_> = unit.all_imports().collect();
        assert_eq!(imports, vec!["fmt", "testing", "m/a"]);
    }
}
