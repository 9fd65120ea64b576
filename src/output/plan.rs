//! Test plan and test matrix formatters
//!
//! Both group the project's own affected packages by application, an
//! application being the first path segment below `<module>/<apps_dir>/`.
//! Indirect identifiers are dropped since they cannot be tested here.

use crate::domain::{AffectedUnit, Report};
use crate::output::ReportFormatter;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// Row name collecting packages outside any application
pub const OTHERS_ROW: &str = "@others";

/// Affected project packages grouped by application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestPlan {
    /// Application name -> its affected packages
    pub apps: BTreeMap<String, Vec<String>>,
    /// Affected packages outside the applications directory
    pub others: Vec<String>,
}

/// One row of a CI job matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixRow {
    pub name: String,
    pub is_app: bool,
    pub packages: Vec<String>,
}

/// Groups the non-indirect entries of `affected` under `<module>/<apps_dir>/`
pub fn build_plan(affected: &[AffectedUnit], module: &str, apps_dir: &str) -> TestPlan {
    let apps_prefix = format!("{}/{}/", module, apps_dir.trim_matches('/'));
    let mut plan = TestPlan::default();

    for unit in affected.iter().filter(|unit| !unit.indirect) {
        let app = unit
            .import_path
            .strip_prefix(&apps_prefix)
            .and_then(|rest| rest.split('/').next())
            .filter(|name| !name.is_empty());

        match app {
            Some(name) => plan
                .apps
                .entry(name.to_string())
                .or_default()
                .push(unit.import_path.clone()),
            None => plan.others.push(unit.import_path.clone()),
        }
    }

    plan
}

impl TestPlan {
    /// One row per application in name order, then the others row when
    /// non-empty
    pub fn matrix(self) -> Vec<MatrixRow> {
        let mut rows: Vec<MatrixRow> = self
            .apps
            .into_iter()
            .map(|(name, packages)| MatrixRow {
                name,
                is_app: true,
                packages,
            })
            .collect();

        if !self.others.is_empty() {
            rows.push(MatrixRow {
                name: OTHERS_ROW.to_string(),
                is_app: false,
                packages: self.others,
            });
        }

        rows
    }
}

/// Writes the test plan as a pretty JSON object
#[derive(Debug)]
pub struct TestPlanFormatter {
    apps_dir: String,
}

impl TestPlanFormatter {
    pub fn new(apps_dir: impl Into<String>) -> Self {
        Self {
            apps_dir: apps_dir.into(),
        }
    }
}

impl ReportFormatter for TestPlanFormatter {
    fn format(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        let plan = build_plan(&report.affected, &report.manifest.module, &self.apps_dir);
        let json = serde_json::to_string_pretty(&plan).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}

/// Writes the test plan as a pretty JSON array of matrix rows
#[derive(Debug)]
pub struct TestMatrixFormatter {
    apps_dir: String,
}

impl TestMatrixFormatter {
    pub fn new(apps_dir: impl Into<String>) -> Self {
        Self {
            apps_dir: apps_dir.into(),
        }
    }
}

impl ReportFormatter for TestMatrixFormatter {
    fn format(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        let rows =
            build_plan(&report.affected, &report.manifest.module, &self.apps_dir).matrix();
        let json = serde_json::to_string_pretty(&rows).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}
