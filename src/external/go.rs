//! go command line adapter
//!
//! Package inventory comes from `go list -json ./...`, module resolution
//! from `go list -m all`. Baseline resolutions point `-modfile` at a
//! temporary copy of the baseline go.mod.

use super::command::run;
use super::Toolchain;
use crate::domain::{ResolvedDependencies, Unit};
use crate::error::{InventoryError, ResolutionError, TempWriteError};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// [`Toolchain`] backed by the `go` executable
#[derive(Debug, Clone)]
pub struct GoCli {
    /// Module root directory
    dir: PathBuf,
}

/// One package object of the `go list -json` stream
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListedPackage {
    dir: PathBuf,
    import_path: String,
    #[serde(default)]
    go_files: Vec<String>,
    #[serde(default)]
    cgo_files: Vec<String>,
    #[serde(default)]
    test_go_files: Vec<String>,
    #[serde(default)]
    x_test_go_files: Vec<String>,
    #[serde(default)]
    imports: Vec<String>,
    #[serde(default)]
    test_imports: Vec<String>,
    #[serde(default)]
    x_test_imports: Vec<String>,
}

impl From<ListedPackage> for Unit {
    fn from(pkg: ListedPackage) -> Self {
        let files = pkg
            .go_files
            .iter()
            .chain(&pkg.cgo_files)
            .chain(&pkg.test_go_files)
            .chain(&pkg.x_test_go_files)
            .map(|name| pkg.dir.join(name))
            .collect();

        Unit {
            import_path: pkg.import_path,
            dir: pkg.dir,
            files,
            imports: pkg.imports,
            test_imports: pkg.test_imports,
            xtest_imports: pkg.x_test_imports,
        }
    }
}

/// Decodes the concatenated JSON objects printed by `go list -json`
pub fn decode_inventory(stream: &[u8]) -> Result<Vec<Unit>, InventoryError> {
    let mut seen = HashSet::new();
    let mut units = Vec::new();

    for pkg in serde_json::Deserializer::from_slice(stream).into_iter::<ListedPackage>() {
        let unit = Unit::from(pkg.map_err(|e| InventoryError::decode(e.to_string()))?);
        if !seen.insert(unit.import_path.clone()) {
            return Err(InventoryError::DuplicateUnit {
                import_path: unit.import_path,
            });
        }
        units.push(unit);
    }

    Ok(units)
}

impl GoCli {
    /// Create a go adapter operating in `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl Toolchain for GoCli {
    async fn unit_inventory(&self) -> Result<Vec<Unit>, InventoryError> {
        let stdout = run("go", &["list", "-json", "./..."], &self.dir).await?;
        let units = decode_inventory(&stdout)?;
        debug!(count = units.len(), "listed packages");
        Ok(units)
    }

    async fn resolved_dependencies(
        &self,
        modfile: Option<&Path>,
    ) -> Result<ResolvedDependencies, ResolutionError> {
        let mut args: Vec<OsString> = vec!["list".into(), "-m".into()];
        if let Some(modfile) = modfile {
            let mut flag = OsString::from("-modfile=");
            flag.push(modfile);
            args.push(flag);
        }
        args.push("all".into());

        let stdout = run("go", args.as_slice(), &self.dir).await?;
        let text = String::from_utf8(stdout).map_err(|_| ResolutionError::InvalidOutput)?;
        let resolved = ResolvedDependencies::parse(&text);
        debug!(
            baseline = modfile.is_some(),
            count = resolved.len(),
            "resolved modules"
        );
        Ok(resolved)
    }
}

/// Baseline go.mod (and go.sum, when available) written to a private
/// temporary directory. Removed on drop.
#[derive(Debug)]
pub struct BaselineModfile {
    _dir: TempDir,
    path: PathBuf,
}

impl BaselineModfile {
    /// File name of the materialised baseline go.mod
    pub const MODFILE: &'static str = "go.base.mod";

    /// File name go derives for the modfile's checksums
    pub const SUMFILE: &'static str = "go.base.sum";

    /// Write the baseline snapshot under the system temporary directory
    pub fn materialize(modfile: &str, sumfile: Option<&str>) -> Result<Self, TempWriteError> {
        Self::materialize_in(&std::env::temp_dir(), modfile, sumfile)
    }

    /// Write the baseline snapshot into a fresh directory under `parent`
    pub fn materialize_in(
        parent: &Path,
        modfile: &str,
        sumfile: Option<&str>,
    ) -> Result<Self, TempWriteError> {
        let dir = tempfile::Builder::new()
            .prefix("ripple-baseline-")
            .tempdir_in(parent)
            .map_err(|e| TempWriteError::new(parent, e))?;

        let path = dir.path().join(Self::MODFILE);
        std::fs::write(&path, modfile).map_err(|e| TempWriteError::new(&path, e))?;

        if let Some(sum) = sumfile {
            let sum_path = dir.path().join(Self::SUMFILE);
            std::fs::write(&sum_path, sum).map_err(|e| TempWriteError::new(&sum_path, e))?;
        }

        Ok(Self { _dir: dir, path })
    }

    /// Path to pass as `-modfile`
    pub fn path(&self) -> &Path {
        &self.path
    }
}
