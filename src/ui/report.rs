use crate::check::ControllerReport;
use crate::domain::acronym::translate;
use crate::domain::health::FindingKind;
use std::io::{self, Write};

/// Plain text report. Controllers without findings print nothing, so a
/// healthy system produces no output at all.
pub struct ReportRenderer;

impl ReportRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, out: &mut dyn Write, reports: &[ControllerReport]) -> io::Result<()> {
        let mut first = true;

        for report in reports.iter().filter(|r| !r.findings.is_empty()) {
            if !first {
                writeln!(out)?;
            }
            first = false;

            let controller = &report.controller;
            write!(out, "{} controller {}", report.utility, controller.index)?;
            if !controller.model.is_empty() {
                write!(out, ": {}", controller.model)?;
            }
            if !controller.health.is_empty() {
                write!(out, " ({})", translate(&controller.health))?;
            }
            writeln!(out)?;

            for finding in report.findings.iter() {
                writeln!(out, "  {}: {}", label(finding.kind), finding.message)?;
            }
        }

        Ok(())
    }
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn label(kind: FindingKind) -> &'static str {
    match kind {
        FindingKind::Summary => "Summary",
        FindingKind::Fault => "Fault",
        FindingKind::Warning => "Warning",
    }
}
