use crate::analysis::{AnalysisContext, Finding, Issue};
use crate::fix::{Fix, FixEdit};
use crate::location::Span;
use crate::parser::xml::{ElementId, XmlDocument};
use crate::resources::DocumentKind;

const ELLIPSIS: &str = "...";

pub fn check(context: &AnalysisContext) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (index, document) in context.project.documents.iter().enumerate() {
        if document.kind != DocumentKind::Values {
            continue;
        }
        let xml = &document.xml;
        for (id, element) in xml.elements() {
            if !holds_text(xml, id) {
                continue;
            }
            for span in &element.text_spans {
                for offset in ellipses(&xml.text()[span.start..span.end]) {
                    let at = span.start + offset;
                    let span = Span::new(at, at + ELLIPSIS.len());
                    findings.push(
                        Finding::new(
                            Issue::TypographyEllipsis,
                            xml.location(span),
                            "Replace \"...\" with ellipsis character (…, &#8230;) ?",
                        )
                        .with_fix(Fix::new("Replace with …", index).with_edit(
                            FixEdit::ReplaceText {
                                span,
                                old: ELLIPSIS.into(),
                                new: "…".into(),
                            },
                        )),
                    );
                }
            }
        }
    }
    findings
}

/// `<string>`, or an `<item>` of a string array or plurals
fn holds_text(xml: &XmlDocument, id: ElementId) -> bool {
    match xml.element(id).name.as_str() {
        "string" => true,
        "item" => xml.parent(id).is_some_and(|parent| {
            matches!(parent.name.as_str(), "string-array" | "array" | "plurals")
        }),
        _ => false,
    }
}

/// Offsets of runs of exactly three dots
fn ellipses(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'.' {
            i += 1;
            continue;
        }
        let run = bytes[i..].iter().take_while(|&&b| b == b'.').count();
        if run == ELLIPSIS.len() {
            found.push(i);
        }
        i += run;
    }
    found
}
