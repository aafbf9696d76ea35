//! Fixture projects written to a temporary directory
#![allow(dead_code)]

use reslint::{AnalysisConfig, AnalysisScope, Analyzer, Config, Finding, Issue, Project};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const ANDROID_NS: &str = "xmlns:android=\"http://schemas.android.com/apk/res/android\"";

pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    pub fn with(self, path: &str, text: &str) -> Self {
        self.write(path, text);
        self
    }

    pub fn write(&self, path: &str, text: &str) -> PathBuf {
        let full = self.dir.path().join(path);
        fs::create_dir_all(full.parent().expect("parent")).expect("create dirs");
        fs::write(&full, text).expect("write fixture");
        full
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.dir.path().join(path)).expect("read fixture")
    }

    pub fn load(&self, scope: AnalysisScope) -> Project {
        Project::load(self.path(), &Config::default(), scope).expect("project loads")
    }

    pub fn analyze_with(&self, config: AnalysisConfig) -> (Project, Vec<Finding>) {
        let project = self.load(config.scope.clone());
        let findings = Analyzer::new(config).analyze(&project);
        (project, findings)
    }

    pub fn analyze(&self) -> Vec<Finding> {
        self.analyze_with(AnalysisConfig::new(AnalysisScope::Project)).1
    }

    pub fn analyze_file(&self, path: &str) -> Vec<Finding> {
        let scope = AnalysisScope::SingleFile(self.path().join(path));
        self.analyze_with(AnalysisConfig::new(scope)).1
    }
}

pub fn of_issue(findings: &[Finding], issue: Issue) -> Vec<&Finding> {
    findings.iter().filter(|f| f.issue == issue).collect()
}

/// A layout whose root has both sizes, wrapping `body`
pub fn layout(body: &str) -> String {
    format!(
        "<LinearLayout {}\n    android:layout_width=\"match_parent\"\n    android:layout_height=\"match_parent\">\n{}\n</LinearLayout>\n",
        ANDROID_NS, body
    )
}
