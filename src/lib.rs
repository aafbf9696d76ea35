//! reslint - Fast lint engine for Android resources
//!
//! This library checks Android resource trees (and the `@Size` annotations
//! of their Java sources) and reports findings with exact source locations
//! and quick fixes rendered as diffs.
//!
//! # Architecture
//!
//! The analysis pipeline consists of:
//! 1. **File Discovery** - Find resource XML and Java files
//! 2. **Parsing** - XML into a located DOM, Java with tree-sitter
//! 3. **Resource Graph** - Every resource across configuration folders, plus ids and includes
//! 4. **Style Resolution** - Parent chains, implicit dot parents and cycles
//! 5. **Rules** - A closed registry run in parallel over an immutable context
//! 6. **Reporting** - Bit-exact text or JSON, with fix diffs

pub mod analysis;
pub mod baseline;
pub mod config;
pub mod constraint;
pub mod discovery;
pub mod fix;
pub mod location;
pub mod parser;
pub mod report;
pub mod resources;
pub mod styles;

pub use analysis::{AnalysisConfig, Analyzer, Finding, Issue, Rule, Severity};
pub use baseline::Baseline;
pub use config::Config;
pub use constraint::SizeConstraint;
pub use discovery::FileFinder;
pub use fix::{Fix, FixComposer, FixEdit};
pub use location::{Location, SourceText, Span};
pub use report::{ReportFormat, Reporter};
pub use resources::{AnalysisScope, Project, ResourceGraph};
pub use styles::{StyleResolver, StyleTable};
