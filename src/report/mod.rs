mod json;
mod text;

pub use json::JsonReporter;
pub use text::{render_fixes, TextReporter};

use crate::analysis::Finding;
use crate::resources::Project;
use clap::ValueEnum;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::io::Write;
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Writes findings to stdout or a file in the chosen format
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
    show_fixes: bool,
    context_lines: usize,
    colored: bool,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self {
            format,
            output_path,
            show_fixes: false,
            context_lines: 0,
            colored: false,
        }
    }

    pub fn with_fixes(mut self, show_fixes: bool, context_lines: usize) -> Self {
        self.show_fixes = show_fixes;
        self.context_lines = context_lines;
        self
    }

    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    pub fn render(&self, findings: &[Finding], project: &Project) -> Result<String> {
        match self.format {
            ReportFormat::Text => Ok(TextReporter::new()
                .with_color(self.colored && self.output_path.is_none())
                .with_fixes(self.show_fixes, self.context_lines)
                .render(findings, project)),
            ReportFormat::Json => JsonReporter::new()
                .with_context_lines(self.context_lines)
                .render(findings, project),
        }
    }

    /// Report the findings
    pub fn report(&self, findings: &[Finding], project: &Project) -> Result<()> {
        let rendered = self.render(findings, project)?;
        match &self.output_path {
            Some(path) => {
                std::fs::write(path, &rendered)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("Failed to write report to {}", path.display()))?;
                eprintln!("Report written to: {}", path.display());
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(rendered.as_bytes()).into_diagnostic()?;
                stdout.flush().into_diagnostic()?;
            }
        }
        Ok(())
    }
}
