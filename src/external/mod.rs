//! Adapters for the external tools the analysis depends on
//!
//! This module provides:
//! - The [`VersionControl`] seam (changed files, file contents at a revision)
//! - The [`Toolchain`] seam (package inventory, module resolution)
//! - git and go command line implementations of both

mod command;
mod git;
mod go;

pub use git::GitCli;
pub use go::{decode_inventory, BaselineModfile, GoCli};

use crate::domain::{ResolvedDependencies, Unit};
use crate::error::{DiffError, InventoryError, ResolutionError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Trait for version-control queries against a baseline revision
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Absolute paths of files changed since `baseline` whose names end in
    /// one of `suffixes`
    async fn changed_files(
        &self,
        baseline: &str,
        suffixes: &[String],
    ) -> Result<Vec<PathBuf>, DiffError>;

    /// Content of `path` (relative to the project directory) at `revision`
    async fn show_file(&self, revision: &str, path: &str) -> Result<String, DiffError>;

    /// Like [`show_file`](Self::show_file), but `None` when `path` does not
    /// exist at `revision`. Any other failure is still an error.
    async fn show_file_if_present(
        &self,
        revision: &str,
        path: &str,
    ) -> Result<Option<String>, DiffError>;
}

/// Trait for build toolchain queries against the working tree
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Every package of the current working tree
    async fn unit_inventory(&self) -> Result<Vec<Unit>, InventoryError>;

    /// Full module resolution, optionally against an alternative go.mod
    async fn resolved_dependencies(
        &self,
        modfile: Option<&Path>,
    ) -> Result<ResolvedDependencies, ResolutionError>;
}
