use crate::analysis::{count_by_severity, Finding};
use crate::fix::FixComposer;
use crate::resources::Project;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

/// JSON reporter for programmatic output
#[derive(Debug, Clone, Default)]
pub struct JsonReporter {
    context_lines: usize,
}

impl JsonReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context_lines(mut self, context_lines: usize) -> Self {
        self.context_lines = context_lines;
        self
    }

    pub fn render(&self, findings: &[Finding], project: &Project) -> Result<String> {
        let report = JsonReport::new(findings, project, self.context_lines);
        let mut json = serde_json::to_string_pretty(&report).into_diagnostic()?;
        json.push('\n');
        Ok(json)
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    findings: Vec<JsonFinding<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonFinding<'a> {
    id: &'static str,
    severity: &'static str,
    message: &'a str,
    file: &'a str,
    line: usize,
    column: usize,
    end_line: usize,
    end_column: usize,
    secondary: Vec<JsonSecondary<'a>>,
    fixes: Vec<JsonFix<'a>>,
}

#[derive(Serialize)]
struct JsonSecondary<'a> {
    file: &'a str,
    line: usize,
    message: &'a str,
}

#[derive(Serialize)]
struct JsonFix<'a> {
    description: &'a str,
    /// Rendered hunks; absent when the fix no longer applies
    diff: Option<String>,
}

#[derive(Serialize)]
struct JsonSummary {
    errors: usize,
    warnings: usize,
}

impl<'a> JsonReport<'a> {
    fn new(findings: &'a [Finding], project: &Project, context_lines: usize) -> Self {
        let composer = FixComposer::new().with_context_lines(context_lines);
        let (errors, warnings) = count_by_severity(findings);
        Self {
            version: env!("CARGO_PKG_VERSION"),
            findings: findings
                .iter()
                .map(|finding| JsonFinding {
                    id: finding.issue.id(),
                    severity: finding.severity.as_str(),
                    message: &finding.message,
                    file: &finding.location.file,
                    line: finding.location.line(),
                    column: finding.location.start.column + 1,
                    end_line: finding.location.end.line + 1,
                    end_column: finding.location.end.column + 1,
                    secondary: finding
                        .secondary
                        .iter()
                        .map(|s| JsonSecondary {
                            file: &s.location.file,
                            line: s.location.line(),
                            message: &s.message,
                        })
                        .collect(),
                    fixes: finding
                        .fixes
                        .iter()
                        .map(|fix| JsonFix {
                            description: &fix.description,
                            diff: project
                                .documents
                                .get(fix.document)
                                .and_then(|d| {
                                    composer.compose(fix, &d.xml, &finding.location).ok()
                                }),
                        })
                        .collect(),
                })
                .collect(),
            summary: JsonSummary { errors, warnings },
        }
    }
}
