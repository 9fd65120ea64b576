//! Output formatting for impact reports
//!
//! This module provides:
//! - Plain output, one affected import path per line
//! - JSON output of the affected list
//! - Test plan and test matrix output grouped by application
//! - Explain output with change reasons and a dependent tree

mod explain;
mod json;
mod plain;
mod plan;

pub use explain::ExplainFormatter;
pub use json::JsonFormatter;
pub use plain::PlainFormatter;
pub use plan::{build_plan, MatrixRow, TestMatrixFormatter, TestPlan, TestPlanFormatter};

use crate::domain::Report;
use std::io::Write;

/// Default directory, relative to the module root, that holds applications
pub const DEFAULT_APPS_DIR: &str = "apps";

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One affected import path per line
    #[default]
    Plain,
    /// JSON array of affected packages
    Json,
    /// JSON object grouping project packages by application
    TestPlan,
    /// JSON array of rows for CI job matrices
    TestMatrix,
    /// Human-readable change reasons and dependent tree
    Explain,
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,
    /// Whether to highlight with colors
    pub color: bool,
    /// Directory below the module path grouped as applications
    pub apps_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: true,
            apps_dir: DEFAULT_APPS_DIR.to_string(),
        }
    }
}

impl OutputConfig {
    /// Create a new output configuration
    pub fn new(format: OutputFormat, color: bool, apps_dir: impl Into<String>) -> Self {
        Self {
            format,
            color,
            apps_dir: apps_dir.into(),
        }
    }
}

/// Trait for report formatters
pub trait ReportFormatter {
    /// Format and write the report
    fn format(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()>;
}

/// Create a report formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn ReportFormatter> {
    match config.format {
        OutputFormat::Plain => Box::new(PlainFormatter::new()),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
        OutputFormat::TestPlan => Box::new(TestPlanFormatter::new(config.apps_dir)),
        OutputFormat::TestMatrix => Box::new(TestMatrixFormatter::new(config.apps_dir)),
        OutputFormat::Explain => Box::new(ExplainFormatter::new(config.color)),
    }
}
