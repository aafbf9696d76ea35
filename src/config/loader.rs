use crate::analysis::Severity;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Configuration for a reslint run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Patterns to exclude from analysis
    pub exclude: Vec<String>,

    /// Fail the whole pass when a file cannot be parsed
    pub abort_on_parse_error: bool,

    /// Issue ids that are never reported
    pub disabled_issues: Vec<String>,

    /// When non-empty, only these issue ids are reported
    pub enabled_only: Vec<String>,

    /// Per-issue severity replacing the issue default
    pub severity_overrides: BTreeMap<String, Severity>,

    /// Unchanged lines shown around each fix hunk
    pub fix_context_lines: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude: vec![
                "**/build/**".to_string(),
                "**/generated/**".to_string(),
                "**/.gradle/**".to_string(),
                "**/.idea/**".to_string(),
            ],
            abort_on_parse_error: false,
            disabled_issues: vec![],
            enabled_only: vec![],
            severity_overrides: BTreeMap::new(),
            fix_context_lines: 0,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [
            ".reslint.yml",
            ".reslint.yaml",
            ".reslint.toml",
            "reslint.yml",
            "reslint.yaml",
            "reslint.toml",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Check if a path matches one of the exclusion patterns
    pub fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");
        self.exclude
            .iter()
            .any(|pattern| glob_match(pattern, &path_str))
    }
}

/// Simple glob matching for patterns like "**/build/**" or "*.bak"
fn glob_match(pattern: &str, text: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix('*') {
        if !pattern.contains('/') {
            return text.ends_with(suffix);
        }
    }

    if let Some(prefix) = pattern.strip_suffix('*') {
        if !pattern.contains('/') {
            return text.starts_with(prefix);
        }
    }

    if pattern.contains("**") {
        // "**/build/**" only matches a whole directory component
        if pattern.starts_with("**/") && pattern.ends_with("/**") {
            let dir_name = pattern
                .trim_start_matches("**/")
                .trim_end_matches("/**")
                .trim_matches('/');
            return text.contains(&format!("/{}/", dir_name))
                || text.starts_with(&format!("{}/", dir_name));
        }

        let parts: Vec<&str> = pattern.split("**").collect();
        if parts.len() == 2 {
            let prefix = parts[0].trim_end_matches('/');
            let suffix = parts[1].trim_start_matches('/');

            return match (prefix.is_empty(), suffix.is_empty()) {
                (true, true) => true,
                (true, false) => text.ends_with(suffix) || text.contains(&format!("/{}", suffix)),
                (false, true) => text.starts_with(prefix) || text.contains(&format!("{}/", prefix)),
                (false, false) => {
                    (text.starts_with(prefix) || text.contains(&format!("/{}/", prefix)))
                        && (text.ends_with(suffix) || text.contains(&format!("/{}", suffix)))
                }
            };
        }
    }

    text == pattern
}
