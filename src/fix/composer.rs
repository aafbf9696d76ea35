use super::{apply_edits, Fix, FixError, TextEdit};
use crate::location::{Location, Span};
use crate::parser::xml::XmlDocument;
use regex::Regex;
use std::fmt::Write;
use std::sync::LazyLock;

static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+) \+(\d+)(?: (.+))?$").expect("hunk header pattern is valid")
});

/// Renders fixes as `Fix for <file> line <N>: <description>:` blocks
///
/// `<file>` and `N` locate the finding that owns the fix. Each `@@ -<old> +<new>`
/// header carries the first changed line on either side, followed by the
/// edited file when it is not the finding's file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixComposer {
    context_lines: usize,
}

/// One changed region: 0-based first line and the replaced/new lines
struct Hunk<'a> {
    first_line: usize,
    before: &'a [&'a str],
    removed: Vec<String>,
    added: Vec<String>,
    after: &'a [&'a str],
}

impl FixComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context_lines(mut self, context_lines: usize) -> Self {
        self.context_lines = context_lines;
        self
    }

    /// Render `fix` for the finding reported at `at`
    pub fn compose(&self, fix: &Fix, doc: &XmlDocument, at: &Location) -> Result<String, FixError> {
        let index = doc.source().index();
        let mut lowered = fix
            .edits
            .iter()
            .map(|edit| edit.lower(doc))
            .collect::<Result<Vec<_>, _>>()?;
        lowered.sort_by_key(|edit| (edit.span.start, edit.span.end));

        // Edits whose lines (or context) touch are rendered as one hunk
        let mut regions: Vec<(usize, usize, Vec<TextEdit>)> = Vec::new();
        for edit in lowered {
            let first = index.line_of(edit.span.start);
            let last = index.line_of(edit.span.end);
            match regions.last_mut() {
                Some(region) if first <= region.1 + self.context_lines => {
                    region.1 = region.1.max(last);
                    region.2.push(edit);
                }
                _ => regions.push((first, last, vec![edit])),
            }
        }

        let lines: Vec<&str> = doc.text().split('\n').collect();
        let mut hunks = Vec::new();
        for (first, last, edits) in &regions {
            if let Some(hunk) = self.hunk(doc, &lines, *first, *last, edits)? {
                hunks.push(hunk);
            }
        }

        if hunks.is_empty() {
            return Ok(String::new());
        }
        let mut out = format!("Fix for {} line {}: {}:\n", at.file, at.line(), fix.description);
        let edited = if doc.display_path() == at.file {
            String::new()
        } else {
            format!(" {}", doc.display_path())
        };
        // Lines added minus lines removed by earlier hunks
        let mut delta: isize = 0;
        for hunk in &hunks {
            let old_line = hunk.first_line + 1;
            let new_line = old_line.saturating_add_signed(delta);
            let _ = writeln!(out, "@@ -{} +{}{}", old_line, new_line, edited);
            for text in hunk.before {
                let _ = writeln!(out, " {}", text);
            }
            for text in &hunk.removed {
                let _ = writeln!(out, "-{}", text);
            }
            for text in &hunk.added {
                let _ = writeln!(out, "+{}", text);
            }
            for text in hunk.after {
                let _ = writeln!(out, " {}", text);
            }
            delta += hunk.added.len() as isize - hunk.removed.len() as isize;
        }
        Ok(out)
    }

    fn hunk<'a>(
        &self,
        doc: &XmlDocument,
        lines: &'a [&'a str],
        first: usize,
        last: usize,
        edits: &[TextEdit],
    ) -> Result<Option<Hunk<'a>>, FixError> {
        let text = doc.text();
        let index = doc.source().index();
        let region_start = index.line_start(first);
        let region_end = if last + 1 < index.line_count() {
            index.line_start(last + 1) - 1
        } else {
            text.len()
        };

        let region = &text[region_start..region_end];
        let shifted: Vec<TextEdit> = edits
            .iter()
            .map(|edit| TextEdit {
                span: Span::new(edit.span.start - region_start, edit.span.end - region_start),
                replacement: edit.replacement.clone(),
            })
            .collect();
        let replaced = apply_edits(region, &shifted)?;
        let old: Vec<&str> = region.split('\n').collect();
        let new: Vec<&str> = replaced.split('\n').collect();

        let prefix = old
            .iter()
            .zip(new.iter())
            .take_while(|(a, b)| a == b)
            .count();
        let suffix = old[prefix..]
            .iter()
            .rev()
            .zip(new[prefix..].iter().rev())
            .take_while(|(a, b)| a == b)
            .count();
        let removed: Vec<String> = old[prefix..old.len() - suffix]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let added: Vec<String> = new[prefix..new.len() - suffix]
            .iter()
            .map(|s| s.to_string())
            .collect();
        if removed.is_empty() && added.is_empty() {
            return Ok(None);
        }

        let changed_first = first + prefix;
        let changed_end = changed_first + removed.len();
        let before_start = changed_first.saturating_sub(self.context_lines);
        let after_end = (changed_end + self.context_lines).min(lines.len());
        Ok(Some(Hunk {
            first_line: changed_first,
            before: &lines[before_start..changed_first],
            removed,
            added,
            after: &lines[changed_end.min(after_end)..after_end],
        }))
    }
}

/// Apply rendered hunks to `original`, checking every `-` and context line
pub fn apply_hunks(original: &str, rendered: &str) -> Result<String, FixError> {
    let mut lines: Vec<String> = original.split('\n').map(str::to_string).collect();
    let mut delta: isize = 0;
    let mut body = rendered
        .split_terminator('\n')
        .skip_while(|l| l.starts_with("Fix for "))
        .peekable();

    while let Some(header) = body.next() {
        let captures = HUNK_HEADER
            .captures(header)
            .ok_or_else(|| FixError::MalformedHunk(header.to_string()))?;
        let line: usize = captures[1]
            .parse()
            .map_err(|_| FixError::MalformedHunk(header.to_string()))?;

        let mut before = Vec::new();
        let mut removed = Vec::new();
        let mut added = Vec::new();
        while let Some(next) = body.peek() {
            if next.starts_with("@@ ") || next.starts_with("Fix for ") {
                break;
            }
            let next = body.next().unwrap_or_default();
            let mut chars = next.chars();
            let marker = chars.next();
            let content = chars.as_str().to_string();
            match marker {
                Some(' ') if removed.is_empty() && added.is_empty() => before.push(content),
                Some(' ') => {}
                Some('-') => removed.push(content),
                Some('+') => added.push(content),
                _ => return Err(FixError::MalformedHunk(next.to_string())),
            }
        }
        while body.peek().is_some_and(|l| l.starts_with("Fix for ")) {
            body.next();
        }

        let start = usize::try_from(line as isize - 1 + delta)
            .map_err(|_| FixError::HunkMismatch(line))?;
        if start + removed.len() > lines.len() {
            return Err(FixError::HunkMismatch(line));
        }
        let context_start = start
            .checked_sub(before.len())
            .ok_or(FixError::HunkMismatch(line))?;
        let matches_context = before
            .iter()
            .enumerate()
            .all(|(i, l)| lines.get(context_start + i) == Some(l));
        let matches_removed = removed
            .iter()
            .enumerate()
            .all(|(i, l)| lines.get(start + i) == Some(l));
        if !matches_context || !matches_removed {
            return Err(FixError::HunkMismatch(line));
        }

        delta += added.len() as isize - removed.len() as isize;
        lines.splice(start..start + removed.len(), added);
    }

    Ok(lines.join("\n"))
}
