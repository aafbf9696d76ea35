//! Quick fixes
//!
//! A [`Fix`] is a list of structural [`FixEdit`]s against one resource
//! document. Edits are lowered to byte-range [`TextEdit`]s, which the
//! [`FixComposer`] renders as diff hunks and the [`FileEditor`] writes back.

mod composer;
mod editor;

pub use composer::{apply_hunks, FixComposer};
pub use editor::FileEditor;

use crate::location::Span;
use crate::parser::xml::{ElementId, XmlAttribute, XmlDocument, XmlElement};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixError {
    #[error("attribute {name} not found on <{element}>")]
    MissingAttribute { element: String, name: String },
    #[error("expected \"{expected}\" at {offset} but found \"{found}\"")]
    TextMismatch {
        expected: String,
        found: String,
        offset: usize,
    },
    #[error("edits overlap at byte {0}")]
    Overlap(usize),
    #[error("malformed hunk: {0}")]
    MalformedHunk(String),
    #[error("hunk does not match the original at line {0}")]
    HunkMismatch(usize),
}

/// A structural edit anchored to a DOM element or a text range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FixEdit {
    InsertAttribute {
        element: ElementId,
        name: String,
        value: String,
    },
    DeleteAttribute {
        element: ElementId,
        name: String,
    },
    ReplaceAttributeValue {
        element: ElementId,
        name: String,
        value: String,
    },
    /// Replace `old`, which must be the exact current text of `span`
    ReplaceText { span: Span, old: String, new: String },
}

/// One fix alternative for a finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fix {
    pub description: String,
    /// Index of the edited resource document
    pub document: usize,
    pub edits: Vec<FixEdit>,
}

impl Fix {
    pub fn new(description: impl Into<String>, document: usize) -> Self {
        Self {
            description: description.into(),
            document,
            edits: Vec::new(),
        }
    }

    pub fn with_edit(mut self, edit: FixEdit) -> Self {
        self.edits.push(edit);
        self
    }
}

/// A byte-range replacement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub span: Span,
    pub replacement: String,
}

impl FixEdit {
    /// Lower to a byte replacement in `doc`
    pub fn lower(&self, doc: &XmlDocument) -> Result<TextEdit, FixError> {
        match self {
            FixEdit::InsertAttribute {
                element,
                name,
                value,
            } => Ok(insert_attribute(doc, doc.element(*element), name, value)),
            FixEdit::DeleteAttribute { element, name } => {
                let attr = find_attribute(doc.element(*element), name)?;
                let text = doc.text().as_bytes();
                let mut start = attr.span.start;
                while start > 0 && text[start - 1].is_ascii_whitespace() {
                    start -= 1;
                }
                Ok(TextEdit {
                    span: Span::new(start, attr.span.end),
                    replacement: String::new(),
                })
            }
            FixEdit::ReplaceAttributeValue {
                element,
                name,
                value,
            } => {
                let attr = find_attribute(doc.element(*element), name)?;
                Ok(TextEdit {
                    span: attr.value_span,
                    replacement: escape_attribute(value),
                })
            }
            FixEdit::ReplaceText { span, old, new } => {
                let found = doc.text().get(span.start..span.end).unwrap_or("");
                if found != old {
                    return Err(FixError::TextMismatch {
                        expected: old.clone(),
                        found: found.to_string(),
                        offset: span.start,
                    });
                }
                Ok(TextEdit {
                    span: *span,
                    replacement: new.clone(),
                })
            }
        }
    }
}

fn find_attribute<'a>(element: &'a XmlElement, name: &str) -> Result<&'a XmlAttribute, FixError> {
    element.attribute(name).ok_or_else(|| FixError::MissingAttribute {
        element: element.name.clone(),
        name: name.to_string(),
    })
}

/// Sort key of the conventional Android attribute order
fn attribute_rank(name: &str) -> (u8, String) {
    let local = name.split_once(':').map_or(name, |(_, local)| local);
    let rank = if name.starts_with("xmlns") {
        0
    } else if local == "id" {
        1
    } else if local == "name" {
        2
    } else if name == "style" {
        3
    } else if local == "layout_width" {
        4
    } else if local == "layout_height" {
        5
    } else if local.starts_with("layout_") {
        6
    } else {
        7
    };
    (rank, local.to_string())
}

fn insert_attribute(doc: &XmlDocument, element: &XmlElement, name: &str, value: &str) -> TextEdit {
    let new_attribute = format!("{}=\"{}\"", name, escape_attribute(value));
    let index = doc.source().index();
    let text = doc.text();
    let name_line = index.line_of(element.name_span.start);
    let multiline = element
        .attributes
        .iter()
        .any(|a| index.line_of(a.span.start) != name_line);
    let indent_of = |attr: &XmlAttribute| {
        let line_start = index.line_start(index.line_of(attr.span.start));
        text[line_start..attr.span.start].to_string()
    };

    let key = attribute_rank(name);
    if let Some(next) = element
        .attributes
        .iter()
        .find(|a| attribute_rank(&a.name) > key)
    {
        let replacement = if multiline && index.line_of(next.span.start) != name_line {
            format!("{}\n{}", new_attribute, indent_of(next))
        } else {
            format!("{} ", new_attribute)
        };
        return TextEdit {
            span: Span::empty(next.span.start),
            replacement,
        };
    }

    match element.attributes.last() {
        Some(last) if multiline => TextEdit {
            span: Span::empty(last.span.end),
            replacement: format!("\n{}{}", indent_of(last), new_attribute),
        },
        Some(last) => TextEdit {
            span: Span::empty(last.span.end),
            replacement: format!(" {}", new_attribute),
        },
        None => TextEdit {
            span: Span::empty(element.name_span.end),
            replacement: format!(" {}", new_attribute),
        },
    }
}

pub fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Apply non-overlapping edits to `text`
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> Result<String, FixError> {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|e| (e.span.start, e.span.end));
    for pair in sorted.windows(2) {
        if pair[1].span.start < pair[0].span.end {
            return Err(FixError::Overlap(pair[1].span.start));
        }
    }

    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;
    for edit in sorted {
        result.push_str(&text[cursor..edit.span.start]);
        result.push_str(&edit.replacement);
        cursor = edit.span.end;
    }
    result.push_str(&text[cursor..]);
    Ok(result)
}

/// Lower and apply every edit of `fix`
pub fn apply_fix(doc: &XmlDocument, fix: &Fix) -> Result<String, FixError> {
    let edits = fix
        .edits
        .iter()
        .map(|edit| edit.lower(doc))
        .collect::<Result<Vec<_>, _>>()?;
    apply_edits(doc.text(), &edits)
}
