use crate::location::{Location, SourceText, Span};
use quick_xml::escape::unescape;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;
use thiserror::Error;
use tracing::trace;

/// Index of an element inside its document
pub type ElementId = usize;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XmlError {
    #[error("{message}")]
    Syntax { message: String, offset: usize },
}

impl XmlError {
    pub fn offset(&self) -> usize {
        match self {
            XmlError::Syntax { offset, .. } => *offset,
        }
    }
}

/// An attribute with the exact byte ranges of its name and value
#[derive(Debug, Clone)]
pub struct XmlAttribute {
    /// Qualified name as written, e.g. `android:layout_width`
    pub name: String,
    /// Unescaped value
    pub value: String,
    /// `name="value"` including quotes
    pub span: Span,
    pub name_span: Span,
    /// Value without the quotes
    pub value_span: Span,
}

impl XmlAttribute {
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map(|(_, local)| local)
            .unwrap_or(&self.name)
    }

    pub fn is_android(&self, local: &str) -> bool {
        self.prefix() == Some("android") && self.local_name() == local
    }
}

#[derive(Debug, Clone)]
pub struct XmlElement {
    pub name: String,
    pub name_span: Span,
    /// From `<` to the closing `>` of the start tag
    pub start_tag: Span,
    /// Offset just past the end tag (or the start tag when self-closing)
    pub end: usize,
    pub self_closing: bool,
    pub attributes: Vec<XmlAttribute>,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
    /// Direct, unescaped character data
    pub text: String,
    /// Raw byte ranges of the direct character data
    pub text_spans: Vec<Span>,
}

impl XmlElement {
    pub fn attribute(&self, name: &str) -> Option<&XmlAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn attribute_value(&self, name: &str) -> Option<&str> {
        self.attribute(name).map(|a| a.value.as_str())
    }

    pub fn android_attribute(&self, local: &str) -> Option<&XmlAttribute> {
        self.attributes.iter().find(|a| a.is_android(local))
    }

    pub fn span(&self) -> Span {
        Span::new(self.start_tag.start, self.end)
    }
}

/// An XML document parsed into an element arena, keeping source offsets
#[derive(Debug, Clone)]
pub struct XmlDocument {
    source: SourceText,
    elements: Vec<XmlElement>,
    root: Option<ElementId>,
}

impl XmlDocument {
    pub fn parse(source: SourceText) -> Result<Self, XmlError> {
        let mut elements: Vec<XmlElement> = Vec::new();
        let mut stack: Vec<ElementId> = Vec::new();
        let mut root = None;

        {
            let text = source.text();
            let mut reader = Reader::from_str(text);
            reader.trim_text(false);
            reader.check_end_names(true);

            loop {
                let start = reader.buffer_position();
                let event = reader.read_event().map_err(|e| XmlError::Syntax {
                    message: e.to_string(),
                    offset: reader.buffer_position(),
                })?;
                let end = reader.buffer_position();

                match event {
                    Event::Start(_) | Event::Empty(_) => {
                        let self_closing = matches!(event, Event::Empty(_));
                        let parent = stack.last().copied();
                        let element = scan_start_tag(text, Span::new(start, end), parent, self_closing)?;
                        let id = elements.len();
                        elements.push(element);
                        match parent {
                            Some(parent) => elements[parent].children.push(id),
                            None if root.is_none() => root = Some(id),
                            None => {
                                return Err(XmlError::Syntax {
                                    message: "multiple root elements".to_string(),
                                    offset: start,
                                })
                            }
                        }
                        if !self_closing {
                            stack.push(id);
                        }
                    }
                    Event::End(_) => {
                        if let Some(id) = stack.pop() {
                            elements[id].end = end;
                        }
                    }
                    Event::Text(ref t) => {
                        if let Some(&top) = stack.last() {
                            let raw = &text[start..end];
                            let value = t
                                .unescape()
                                .map(Cow::into_owned)
                                .unwrap_or_else(|_| raw.to_string());
                            elements[top].text.push_str(&value);
                            elements[top].text_spans.push(Span::new(start, end));
                        }
                    }
                    Event::CData(ref c) => {
                        if let Some(&top) = stack.last() {
                            elements[top].text.push_str(&String::from_utf8_lossy(c));
                            elements[top].text_spans.push(Span::new(start, end));
                        }
                    }
                    Event::Eof => break,
                    _ => {}
                }
            }

            if let Some(&open) = stack.last() {
                return Err(XmlError::Syntax {
                    message: format!("unclosed element <{}>", elements[open].name),
                    offset: text.len(),
                });
            }
        }

        trace!(
            "Parsed {}: {} elements",
            source.display_path(),
            elements.len()
        );

        Ok(Self {
            source,
            elements,
            root,
        })
    }

    pub fn source(&self) -> &SourceText {
        &self.source
    }

    pub fn text(&self) -> &str {
        self.source.text()
    }

    pub fn display_path(&self) -> &str {
        self.source.display_path()
    }

    pub fn root_id(&self) -> Option<ElementId> {
        self.root
    }

    pub fn root(&self) -> Option<&XmlElement> {
        self.root.map(|id| &self.elements[id])
    }

    pub fn element(&self, id: ElementId) -> &XmlElement {
        &self.elements[id]
    }

    /// All elements in document order
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &XmlElement)> {
        self.elements.iter().enumerate()
    }

    pub fn children(&self, id: ElementId) -> impl Iterator<Item = (ElementId, &XmlElement)> {
        self.elements[id]
            .children
            .iter()
            .map(move |&child| (child, &self.elements[child]))
    }

    pub fn parent(&self, id: ElementId) -> Option<&XmlElement> {
        self.elements[id].parent.map(|p| &self.elements[p])
    }

    /// The element itself followed by its ancestors up to the root
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = &XmlElement> {
        std::iter::successors(Some(&self.elements[id]), move |e| {
            e.parent.map(|p| &self.elements[p])
        })
    }

    pub fn location(&self, span: Span) -> Location {
        self.source.location(span)
    }

    /// Innermost element whose span contains `offset`
    pub fn element_at(&self, offset: usize) -> Option<ElementId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.start_tag.start <= offset && offset < e.end.max(e.start_tag.end))
            .map(|(id, _)| id)
            .last()
    }

    /// Whether `tools:ignore` on the element or an ancestor names `issue_id`
    pub fn is_suppressed(&self, id: ElementId, issue_id: &str) -> bool {
        self.ancestors(id).any(|element| {
            element
                .attribute_value("tools:ignore")
                .map(|ignored| {
                    ignored
                        .split(',')
                        .map(str::trim)
                        .any(|name| name == issue_id || name == "all")
                })
                .unwrap_or(false)
        })
    }
}

/// Scan a raw start tag for the element name and attribute spans
fn scan_start_tag(
    text: &str,
    tag: Span,
    parent: Option<ElementId>,
    self_closing: bool,
) -> Result<XmlElement, XmlError> {
    let bytes = text.as_bytes();
    let syntax = |message: &str, offset: usize| XmlError::Syntax {
        message: message.to_string(),
        offset,
    };
    let is_name_end = |b: u8| b.is_ascii_whitespace() || b == b'/' || b == b'>' || b == b'=';

    let mut pos = tag.start + 1;
    let name_start = pos;
    while pos < tag.end && !is_name_end(bytes[pos]) {
        pos += 1;
    }
    let name_span = Span::new(name_start, pos);

    let mut attributes = Vec::new();
    loop {
        while pos < tag.end && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= tag.end || bytes[pos] == b'/' || bytes[pos] == b'>' {
            break;
        }

        let attr_start = pos;
        while pos < tag.end && !is_name_end(bytes[pos]) {
            pos += 1;
        }
        let attr_name = Span::new(attr_start, pos);
        while pos < tag.end && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= tag.end || bytes[pos] != b'=' {
            return Err(syntax("expected '=' after attribute name", pos));
        }
        pos += 1;
        while pos < tag.end && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let quote = match bytes.get(pos) {
            Some(&q) if q == b'"' || q == b'\'' => q,
            _ => return Err(syntax("expected quoted attribute value", pos)),
        };
        pos += 1;
        let value_start = pos;
        while pos < tag.end && bytes[pos] != quote {
            pos += 1;
        }
        if pos >= tag.end {
            return Err(syntax("unterminated attribute value", value_start));
        }
        let value_span = Span::new(value_start, pos);
        pos += 1;

        let raw = &text[value_span.start..value_span.end];
        let value = unescape(raw)
            .map(Cow::into_owned)
            .unwrap_or_else(|_| raw.to_string());

        attributes.push(XmlAttribute {
            name: text[attr_name.start..attr_name.end].to_string(),
            value,
            span: Span::new(attr_start, pos),
            name_span: attr_name,
            value_span,
        });
    }

    Ok(XmlElement {
        name: text[name_span.start..name_span.end].to_string(),
        name_span,
        start_tag: tag,
        end: tag.end,
        self_closing,
        attributes,
        parent,
        children: Vec::new(),
        text: String::new(),
        text_spans: Vec::new(),
    })
}
