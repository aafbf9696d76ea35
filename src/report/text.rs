use crate::analysis::{count_by_severity, Finding, Severity};
use crate::fix::FixComposer;
use crate::resources::Project;
use colored::Colorize;
use std::fmt::Write;
use tracing::warn;

/// Plain text reporter, one block per finding
///
/// ```text
/// res/layout/main.xml:3: Error: The required layout_width attribute is missing [RequiredSize]
///     <TextView android:layout_height="wrap_content" />
///      ~~~~~~~~
/// 1 errors, 0 warnings
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextReporter {
    colored: bool,
    show_fixes: bool,
    context_lines: usize,
}

impl TextReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color severities and the summary; only for terminals
    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    pub fn with_fixes(mut self, show_fixes: bool, context_lines: usize) -> Self {
        self.show_fixes = show_fixes;
        self.context_lines = context_lines;
        self
    }

    pub fn render(&self, findings: &[Finding], project: &Project) -> String {
        let mut out = String::new();
        for finding in findings {
            let _ = writeln!(
                out,
                "{}:{}: {}: {} [{}]",
                finding.location.file,
                finding.location.line(),
                self.severity(finding.severity),
                finding.message,
                finding.issue
            );
            let _ = writeln!(out, "{}", finding.location.source_line);
            let _ = writeln!(out, "{}", finding.location.underline());
            for secondary in &finding.secondary {
                let _ = writeln!(
                    out,
                    "    {}:{}: {}",
                    secondary.location.file,
                    secondary.location.line(),
                    secondary.message
                );
            }
        }
        out.push_str(&self.summary(findings));

        if self.show_fixes {
            out.push_str(&render_fixes(findings, project, self.context_lines));
        }
        out
    }

    fn severity(&self, severity: Severity) -> String {
        match (self.colored, severity) {
            (false, _) => severity.label().to_string(),
            (true, Severity::Error) => severity.label().red().bold().to_string(),
            (true, Severity::Warning) => severity.label().yellow().bold().to_string(),
        }
    }

    fn summary(&self, findings: &[Finding]) -> String {
        if findings.is_empty() {
            let line = "No warnings.";
            return if self.colored {
                format!("{}\n", line.green())
            } else {
                format!("{}\n", line)
            };
        }
        let (errors, warnings) = count_by_severity(findings);
        format!("{} errors, {} warnings\n", errors, warnings)
    }
}

/// Every fix alternative as a diff block, in finding then proposal order
pub fn render_fixes(findings: &[Finding], project: &Project, context_lines: usize) -> String {
    let composer = FixComposer::new().with_context_lines(context_lines);
    let mut out = String::new();
    for (finding, fix) in findings
        .iter()
        .flat_map(|finding| finding.fixes.iter().map(move |fix| (finding, fix)))
    {
        let Some(document) = project.documents.get(fix.document) else {
            continue;
        };
        match composer.compose(fix, &document.xml, &finding.location) {
            Ok(rendered) => out.push_str(&rendered),
            Err(e) => warn!("Cannot render fix \"{}\": {}", fix.description, e),
        }
    }
    out
}
