//! Rule registry and analysis pass
//!
//! A pass builds the [`ResourceGraph`] and [`StyleTable`] once, wraps them
//! in an immutable [`AnalysisContext`] and runs every enabled [`Rule`] over
//! it in parallel. Findings are then filtered (disabled issues,
//! `tools:ignore`, `@SuppressLint`), re-graded and sorted.

pub mod rules;

pub use rules::Rule;

use crate::config::Config;
use crate::fix::Fix;
use crate::location::{Location, SecondaryLocation};
use crate::resources::{AnalysisScope, Project, ResourceGraph};
use crate::styles::{StyleResolver, StyleTable};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info};

/// Severity of an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// As printed in text reports
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Issues that rules can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Issue {
    RequiredSize,
    MissingTranslation,
    ExtraTranslation,
    UnknownId,
    UnknownIdInLayout,
    UnassignedId,
    StyleCycle,
    Range,
    TypographyEllipsis,
    ParseError,
}

impl Issue {
    pub const ALL: [Issue; 10] = [
        Issue::RequiredSize,
        Issue::MissingTranslation,
        Issue::ExtraTranslation,
        Issue::UnknownId,
        Issue::UnknownIdInLayout,
        Issue::UnassignedId,
        Issue::StyleCycle,
        Issue::Range,
        Issue::TypographyEllipsis,
        Issue::ParseError,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Issue::RequiredSize => "RequiredSize",
            Issue::MissingTranslation => "MissingTranslation",
            Issue::ExtraTranslation => "ExtraTranslation",
            Issue::UnknownId => "UnknownId",
            Issue::UnknownIdInLayout => "UnknownIdInLayout",
            Issue::UnassignedId => "UnassignedId",
            Issue::StyleCycle => "StyleCycle",
            Issue::Range => "Range",
            Issue::TypographyEllipsis => "TypographyEllipsis",
            Issue::ParseError => "ParseError",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|issue| issue.id() == id)
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            Issue::UnknownIdInLayout | Issue::UnassignedId | Issue::TypographyEllipsis => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Issue::RequiredSize => "Missing layout_width or layout_height attributes",
            Issue::MissingTranslation => "Incomplete translation",
            Issue::ExtraTranslation => "Extra translation",
            Issue::UnknownId => "Reference to an unknown id",
            Issue::UnknownIdInLayout => "Reference to an id that is not in the current layout",
            Issue::UnassignedId => "Id declared but never assigned to a view",
            Issue::StyleCycle => "Cycle in style definitions",
            Issue::Range => "Outside range",
            Issue::TypographyEllipsis => "Ellipsis string can be replaced with ellipsis character",
            Issue::ParseError => "File could not be parsed",
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// One reported diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub issue: Issue,
    pub severity: Severity,
    pub location: Location,
    pub message: String,
    /// Alternatives in proposal order
    pub fixes: Vec<Fix>,
    pub secondary: Vec<SecondaryLocation>,
}

impl Finding {
    pub fn new(issue: Issue, location: Location, message: impl Into<String>) -> Self {
        Self {
            issue,
            severity: issue.default_severity(),
            location,
            message: message.into(),
            fixes: Vec::new(),
            secondary: Vec::new(),
        }
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fixes.push(fix);
        self
    }

    pub fn with_secondary(mut self, location: Location, message: impl Into<String>) -> Self {
        self.secondary.push(SecondaryLocation::new(location, message));
        self
    }

    /// Sort key: file, line, column, issue id, message
    fn sort_key(&self) -> (&str, usize, usize, &'static str, &str) {
        let (file, line, column) = self.location.sort_key();
        (file, line, column, self.issue.id(), &self.message)
    }
}

/// Explicit per-pass configuration
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    pub scope: AnalysisScope,
    pub abort_on_parse_error: bool,
    pub disabled: Vec<String>,
    pub enabled_only: Vec<String>,
    pub severity_overrides: BTreeMap<String, Severity>,
    pub fix_context_lines: usize,
}

impl AnalysisConfig {
    pub fn new(scope: AnalysisScope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    pub fn from_config(config: &Config, scope: AnalysisScope) -> Self {
        Self {
            scope,
            abort_on_parse_error: config.abort_on_parse_error,
            disabled: config.disabled_issues.clone(),
            enabled_only: config.enabled_only.clone(),
            severity_overrides: config.severity_overrides.clone(),
            fix_context_lines: config.fix_context_lines,
        }
    }

    pub fn is_enabled(&self, issue: Issue) -> bool {
        let id = issue.id();
        if self.disabled.iter().any(|d| d == id) {
            return false;
        }
        self.enabled_only.is_empty() || self.enabled_only.iter().any(|e| e == id)
    }

    pub fn severity_for(&self, issue: Issue) -> Severity {
        self.severity_overrides
            .get(issue.id())
            .copied()
            .unwrap_or_else(|| issue.default_severity())
    }
}

/// Read-only state shared by every rule of a pass
pub struct AnalysisContext<'a> {
    pub project: &'a Project,
    pub graph: &'a ResourceGraph,
    pub styles: StyleResolver<'a>,
    pub config: &'a AnalysisConfig,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        project: &'a Project,
        graph: &'a ResourceGraph,
        styles: &'a StyleTable,
        config: &'a AnalysisConfig,
    ) -> Self {
        Self {
            project,
            graph,
            styles: StyleResolver::new(styles),
            config,
        }
    }

    pub fn is_single_file(&self) -> bool {
        self.graph.scope().is_single_file()
    }
}

/// Runs the rule registry over a loaded project
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze(&self, project: &Project) -> Vec<Finding> {
        let start = Instant::now();
        let graph = ResourceGraph::build(project);
        let styles = StyleTable::build(&graph);
        let context = AnalysisContext::new(project, &graph, &styles, &self.config);

        let rules: Vec<Rule> = Rule::ALL
            .into_iter()
            .filter(|rule| rule.issues().iter().any(|i| self.config.is_enabled(*i)))
            .collect();

        let mut findings: Vec<Finding> = rules
            .par_iter()
            .flat_map(|rule| {
                let rule_start = Instant::now();
                let found = rule.check(&context);
                debug!(
                    "{:?}: {} findings in {:?}",
                    rule,
                    found.len(),
                    rule_start.elapsed()
                );
                found
            })
            .filter(|finding| self.config.is_enabled(finding.issue))
            .filter(|finding| !is_suppressed(project, finding))
            .map(|mut finding| {
                finding.severity = self.config.severity_for(finding.issue);
                finding
            })
            .collect();

        findings.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        findings.dedup();

        info!(
            "Analysis found {} issues in {:?}",
            findings.len(),
            start.elapsed()
        );
        findings
    }
}

/// `tools:ignore` on the anchoring element or an ancestor, or `@SuppressLint`
fn is_suppressed(project: &Project, finding: &Finding) -> bool {
    let offset = finding.location.start.offset;
    let id = finding.issue.id();
    if let Some(index) = project.document_for(&finding.location.file) {
        let doc = &project.documents[index].xml;
        return doc
            .element_at(offset)
            .is_some_and(|element| doc.is_suppressed(element, id));
    }
    project
        .java
        .iter()
        .find(|file| file.source.display_path() == finding.location.file)
        .is_some_and(|file| file.is_suppressed(offset, id))
}

/// Number of (errors, warnings)
pub fn count_by_severity(findings: &[Finding]) -> (usize, usize) {
    findings.iter().fold((0, 0), |(errors, warnings), f| match f.severity {
        Severity::Error => (errors + 1, warnings),
        Severity::Warning => (errors, warnings + 1),
    })
}
