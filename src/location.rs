//! Source locations
//!
//! Maps byte offsets in a source text to line/column positions and renders
//! the `file:line:` header, the offending source line and the caret or tilde
//! underline used by every text report.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Half-open byte range in a source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start after end");
        Self { start, end }
    }

    pub fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Line/column position; both 0-based, column counted in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

/// Start offsets of every line of a text
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            line_starts,
            len: text.len(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 0-based line containing the byte offset
    pub fn line_of(&self, offset: usize) -> usize {
        let offset = offset.min(self.len);
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        }
    }

    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts.get(line).copied().unwrap_or(self.len)
    }

    /// Offset just past the line content, excluding `\n` and a preceding `\r`
    pub fn line_end(&self, text: &str, line: usize) -> usize {
        let next = self
            .line_starts
            .get(line + 1)
            .map(|start| start - 1)
            .unwrap_or(self.len);
        if next > self.line_start(line) && text.as_bytes().get(next - 1) == Some(&b'\r') {
            next - 1
        } else {
            next
        }
    }

    pub fn line_text<'a>(&self, text: &'a str, line: usize) -> &'a str {
        &text[self.line_start(line)..self.line_end(text, line)]
    }

    pub fn position(&self, text: &str, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = self.line_of(offset);
        let start = self.line_start(line);
        let column = text
            .get(start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - start);
        Position {
            line,
            column,
            offset,
        }
    }
}

/// A source text with its line index and project-relative display path
#[derive(Debug, Clone)]
pub struct SourceText {
    path: PathBuf,
    display_path: String,
    text: Arc<str>,
    index: LineIndex,
}

impl SourceText {
    pub fn new(path: PathBuf, display_path: String, text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let index = LineIndex::new(&text);
        Self {
            path,
            display_path,
            text,
            index,
        }
    }

    /// Build a source whose display path is `path` relative to `root`
    pub fn relative_to(root: &Path, path: PathBuf, text: impl Into<Arc<str>>) -> Self {
        let display_path = display_path(root, &path);
        Self::new(path, display_path, text)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_path(&self) -> &str {
        &self.display_path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn index(&self) -> &LineIndex {
        &self.index
    }

    pub fn position(&self, offset: usize) -> Position {
        self.index.position(&self.text, offset)
    }

    pub fn location(&self, span: Span) -> Location {
        let start = self.position(span.start);
        let end = self.position(span.end);
        Location {
            file: self.display_path.clone(),
            start,
            end,
            source_line: self.index.line_text(&self.text, start.line).to_string(),
        }
    }
}

/// Forward-slash path of `path` relative to `root`
pub fn display_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// A span resolved to positions, carrying the text of its first line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: String,
    pub start: Position,
    pub end: Position,
    #[serde(skip)]
    pub source_line: String,
}

impl Location {
    /// 1-based line number as printed in reports
    pub fn line(&self) -> usize {
        self.start.line + 1
    }

    pub fn span(&self) -> Span {
        Span::new(self.start.offset, self.end.offset)
    }

    /// Underline for the source line: tildes under a single-line span, a caret otherwise
    pub fn underline(&self) -> String {
        let mut out: String = self
            .source_line
            .chars()
            .take(self.start.column)
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();
        let pad = self.start.column.saturating_sub(out.chars().count());
        out.extend(std::iter::repeat(' ').take(pad));

        let width = self.end.column.saturating_sub(self.start.column);
        if self.start.line == self.end.line && width > 0 {
            out.extend(std::iter::repeat('~').take(width));
        } else {
            out.push('^');
        }
        out
    }

    /// Sort key used to order findings
    pub fn sort_key(&self) -> (&str, usize, usize) {
        (&self.file, self.start.line, self.start.column)
    }
}

/// An auxiliary location attached to a finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecondaryLocation {
    pub location: Location,
    pub message: String,
}

impl SecondaryLocation {
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}
