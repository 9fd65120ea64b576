//! JSON output formatter for machine processing

use crate::domain::Report;
use crate::output::ReportFormatter;
use std::io::Write;

/// Writes the affected list as a pretty JSON array of
/// `{"ImportPath": ..., "Indirect": ...}` objects
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&report.affected).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }
}
