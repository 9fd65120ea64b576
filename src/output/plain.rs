//! Plain output formatter, one affected import path per line

use crate::domain::Report;
use crate::output::ReportFormatter;
use std::io::Write;

/// Lists every affected identifier, indirect ones included
#[derive(Debug, Default)]
pub struct PlainFormatter;

impl PlainFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for PlainFormatter {
    fn format(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        for unit in &report.affected {
            writeln!(writer, "{}", unit.import_path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::{empty_report, render, sample_report};

    #[test]
    fn test_plain_lists_all_affected_in_order() {
        let output = render(&PlainFormatter::new(), &sample_report());
        assert_eq!(
            output,
            "example.com/shop/apps/billing\n\
             example.com/shop/apps/cart/api\n\
             example.com/shop/pkg/money\n\
             ext/log\n"
        );
    }

    #[test]
    fn test_plain_empty_report_prints_nothing() {
        assert!(render(&PlainFormatter::new(), &empty_report()).is_empty());
    }
}
