//! Impact engine coordinating the whole analysis
//!
//! This module provides:
//! - Workflow coordination: signals → reconcile → propagate → assemble
//! - Concurrent collection of the three change signals
//! - Deadline enforcement and progress reporting around every external call
//! - Fail-fast error handling (no partial reports)

use crate::domain::Report;
use crate::error::AppError;
use crate::external::{BaselineModfile, Toolchain, VersionControl};
use crate::impact::{
    assemble_affected, diff_manifests, diff_resolutions, reconcile, FileIndex, PropagationMode,
    ReverseGraph,
};
use crate::manifest::{parse_manifest, read_manifest, CHECKSUM_FILENAME, MANIFEST_FILENAME};
use crate::progress::Progress;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Default suffixes of source files considered by the file signal
pub const DEFAULT_SOURCE_SUFFIXES: &[&str] = &[".go"];

/// Configuration for the impact engine
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Module root directory (holds go.mod)
    pub project_dir: PathBuf,
    /// Changed files must end in one of these to count
    pub source_suffixes: Vec<String>,
    /// How changed identifiers match import paths
    pub propagation: PropagationMode,
    /// Upper bound for the whole run, checked around each external call
    pub timeout: Option<Duration>,
}

impl EngineSettings {
    /// Settings with defaults for everything but the project directory
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            source_suffixes: DEFAULT_SOURCE_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            propagation: PropagationMode::default(),
            timeout: None,
        }
    }
}

/// Computes the packages affected by changes since a baseline revision
pub struct ImpactEngine<V, T> {
    vcs: V,
    toolchain: T,
    settings: EngineSettings,
    progress: Progress,
}

/// Deadline `timeout` from now; a timeout too large to represent as an
/// instant imposes none
fn deadline_after(timeout: Option<Duration>) -> Option<Instant> {
    timeout.and_then(|t| Instant::now().checked_add(t))
}

/// Await `fut` as the named `step`, failing with `DeadlineExceeded` once
/// `deadline` passes
async fn within<F, R, E>(
    progress: &Progress,
    deadline: Option<Instant>,
    step: &str,
    fut: F,
) -> Result<R, AppError>
where
    F: Future<Output = Result<R, E>>,
    E: Into<AppError>,
{
    progress.step_started(step);
    let result = match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, fut)
            .await
            .map_err(|_| AppError::deadline_exceeded(step)),
        None => Ok(fut.await),
    };
    progress.step_finished(step);
    result?.map_err(Into::into)
}

impl<V: VersionControl, T: Toolchain> ImpactEngine<V, T> {
    /// Create an engine over the given collaborators
    pub fn new(vcs: V, toolchain: T, settings: EngineSettings) -> Self {
        Self {
            vcs,
            toolchain,
            settings,
            progress: Progress::hidden(),
        }
    }

    /// Report running steps on `progress`; the engine clears it when a run ends
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    /// Run the full analysis against `baseline`.
    ///
    /// The first failing step aborts the run.
    pub async fn compute_impact(&self, baseline: &str) -> Result<Report, AppError> {
        let result = self.analyze(baseline).await;
        self.progress.finish_and_clear();
        result
    }

    async fn analyze(&self, baseline: &str) -> Result<Report, AppError> {
        let deadline = deadline_after(self.settings.timeout);
        let progress = &self.progress;

        let manifest = read_manifest(&self.settings.project_dir.join(MANIFEST_FILENAME))?;
        info!(module = %manifest.module, baseline, "computing impact");

        // go.mod diff and module graph diff both need the baseline go.mod,
        // so they share one branch
        let dependency_signals = async {
            let baseline_text = within(
                progress,
                deadline,
                "reading the baseline go.mod",
                self.vcs.show_file(baseline, MANIFEST_FILENAME),
            )
            .await?;
            let origin = format!("{}:{}", baseline, MANIFEST_FILENAME);
            let baseline_manifest = parse_manifest(&baseline_text, &origin)?;
            let requirement_changes = diff_manifests(&baseline_manifest, &manifest);
            debug!(count = requirement_changes.len(), "go.mod requirement changes");

            let baseline_sum = within(
                progress,
                deadline,
                "reading the baseline go.sum",
                self.vcs.show_file_if_present(baseline, CHECKSUM_FILENAME),
            )
            .await?;
            if baseline_sum.is_none() {
                debug!(baseline, "no go.sum at baseline");
            }

            let modfile = BaselineModfile::materialize(&baseline_text, baseline_sum.as_deref())?;
            let baseline_resolution = within(
                progress,
                deadline,
                "resolving baseline modules",
                self.toolchain.resolved_dependencies(Some(modfile.path())),
            )
            .await?;

            Ok::<_, AppError>((requirement_changes, baseline_resolution))
        };

        let (dependency_changes, changed_files, units, current_resolution) = tokio::try_join!(
            dependency_signals,
            within(
                progress,
                deadline,
                "diffing against the baseline",
                self.vcs
                    .changed_files(baseline, &self.settings.source_suffixes),
            ),
            within(progress, deadline, "listing packages", self.toolchain.unit_inventory()),
            within(
                progress,
                deadline,
                "resolving current modules",
                self.toolchain.resolved_dependencies(None),
            ),
        )?;
        let (requirement_changes, baseline_resolution) = dependency_changes;

        let resolution_changes = diff_resolutions(&baseline_resolution, &current_resolution);
        debug!(count = resolution_changes.len(), "module graph changes");

        let file_changes = FileIndex::new(&units).changes_for(&changed_files);
        debug!(
            files = changed_files.len(),
            units = file_changes.len(),
            "file changes mapped"
        );

        let changes = reconcile(file_changes, requirement_changes, resolution_changes);

        let graph = ReverseGraph::build(&units);
        let closure = graph.propagate(changes.ids(), self.settings.propagation);
        let affected = assemble_affected(closure, &manifest);
        info!(
            changes = changes.len(),
            affected = affected.len(),
            "impact computed"
        );

        Ok(Report {
            manifest,
            changed_files,
            units,
            changes,
            affected,
            propagation: self.settings.propagation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_settings_defaults() {
        let settings = EngineSettings::new("/repo");
        assert_eq!(settings.project_dir, PathBuf::from("/repo"));
        assert_eq!(settings.source_suffixes, vec![".go".to_string()]);
        assert_eq!(settings.propagation, PropagationMode::Exact);
        assert!(settings.timeout.is_none());
    }

    #[test]
    fn test_deadline_after() {
        assert!(deadline_after(None).is_none());
        assert!(deadline_after(Some(Duration::from_secs(30))).is_some());
        assert!(deadline_after(Some(Duration::MAX)).is_none());
    }

    #[tokio::test]
    async fn test_within_passes_results_through() {
        let progress = Progress::hidden();
        let value = within(&progress, None, "step", async { Ok::<_, AppError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_within_reports_running_step() {
        let progress = Progress::hidden();
        let during = within(&progress, None, "listing packages", async {
            Ok::<_, AppError>(progress.message())
        })
        .await
        .unwrap();

        assert_eq!(during, "Analyzing: listing packages");
        assert_eq!(progress.message(), "Analyzing");
    }

    #[tokio::test]
    async fn test_within_reports_expired_deadline() {
        let progress = Progress::hidden();
        let deadline = Some(Instant::now());
        let err = within(&progress, deadline, "listing packages", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, AppError>(())
        })
        .await
        .unwrap_err();

        assert!(
            matches!(err, AppError::DeadlineExceeded { ref step } if step == "listing packages")
        );
        assert_eq!(progress.message(), "Analyzing");
    }
}
