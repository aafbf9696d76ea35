//! Baselines of known findings
//!
//! A baseline records findings by `(issue id, file, message)` so that a later
//! run only reports what is new. Positions are not part of the fingerprint.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

use crate::analysis::Finding;

#[derive(Error, Debug)]
pub enum BaselineError {
    #[error("Failed to read baseline file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse baseline: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Baseline version mismatch (found {0})")]
    VersionMismatch(u32),
}

const BASELINE_VERSION: u32 = 1;

/// Identity of a finding across runs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    pub id: String,
    /// Project-relative path with `/` separators
    pub file: String,
    pub message: String,
}

impl Fingerprint {
    pub fn of(finding: &Finding) -> Self {
        Self {
            id: finding.issue.id().to_string(),
            file: finding.location.file.clone(),
            message: finding.message.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Baseline {
    pub version: u32,
    pub issues: Vec<Fingerprint>,
    #[serde(skip)]
    known: HashSet<Fingerprint>,
}

impl Baseline {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut issues: Vec<Fingerprint> = findings.iter().map(Fingerprint::of).collect();
        issues.dedup();
        Self::with_issues(issues)
    }

    fn with_issues(issues: Vec<Fingerprint>) -> Self {
        Self {
            version: BASELINE_VERSION,
            known: issues.iter().cloned().collect(),
            issues,
        }
    }

    pub fn load(path: &Path) -> Result<Self, BaselineError> {
        let file = fs::File::open(path)?;
        let baseline: Self = serde_json::from_reader(BufReader::new(file))?;
        if baseline.version != BASELINE_VERSION {
            return Err(BaselineError::VersionMismatch(baseline.version));
        }
        Ok(Self::with_issues(baseline.issues))
    }

    pub fn save(&self, path: &Path) -> Result<(), BaselineError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(fs::File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn contains(&self, finding: &Finding) -> bool {
        self.known.contains(&Fingerprint::of(finding))
    }

    /// Findings not recorded in the baseline, order preserved
    pub fn filter_new(&self, findings: Vec<Finding>) -> Vec<Finding> {
        findings.into_iter().filter(|f| !self.contains(f)).collect()
    }
}
