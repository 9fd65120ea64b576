//! git command line adapter

use super::command::run;
use super::VersionControl;
use crate::error::{CommandError, DiffError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// [`VersionControl`] backed by the `git` executable
#[derive(Debug, Clone)]
pub struct GitCli {
    /// Directory git commands run in (the Go module root)
    dir: PathBuf,
}

impl GitCli {
    /// Create a git adapter operating in `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn run_text(&self, args: &[&str]) -> Result<String, DiffError> {
        let stdout = run("git", args, &self.dir).await?;
        String::from_utf8(stdout).map_err(|_| DiffError::InvalidOutput {
            command: format!("git {}", args.join(" ")),
        })
    }

    /// `<revision>:./<path>`, resolved relative to the working directory
    fn object_name(revision: &str, path: &str) -> String {
        format!("{}:./{}", revision, path)
    }

    /// Root of the working tree; `git diff` reports paths relative to it
    async fn toplevel(&self) -> Result<PathBuf, DiffError> {
        let out = self.run_text(&["rev-parse", "--show-toplevel"]).await?;
        Ok(PathBuf::from(out.trim()))
    }
}

/// Keep lines ending in one of `suffixes`, resolved against `root`
fn filter_changed(output: &str, root: &Path, suffixes: &[String]) -> Vec<PathBuf> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| suffixes.iter().any(|suffix| line.ends_with(suffix.as_str())))
        .map(|line| root.join(line))
        .collect()
}

#[async_trait]
impl VersionControl for GitCli {
    async fn changed_files(
        &self,
        baseline: &str,
        suffixes: &[String],
    ) -> Result<Vec<PathBuf>, DiffError> {
        let root = self.toplevel().await?;
        let out = self
            .run_text(&["diff", "--name-only", baseline, "--"])
            .await?;
        let files = filter_changed(&out, &root, suffixes);
        debug!(baseline, count = files.len(), "changed source files");
        Ok(files)
    }

    async fn show_file(&self, revision: &str, path: &str) -> Result<String, DiffError> {
        let object = Self::object_name(revision, path);
        self.run_text(&["show", object.as_str()]).await
    }

    async fn show_file_if_present(
        &self,
        revision: &str,
        path: &str,
    ) -> Result<Option<String>, DiffError> {
        let object = Self::object_name(revision, path);
        // cat-file -e exits non-zero when the object is missing
        match run("git", &["cat-file", "-e", object.as_str()], &self.dir).await {
            Ok(_) => self.show_file(revision, path).await.map(Some),
            Err(CommandError::Exit { .. }) => {
                debug!(revision, path, "file absent at revision");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
