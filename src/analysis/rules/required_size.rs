use crate::analysis::{AnalysisContext, Finding, Issue};
use crate::fix::{Fix, FixEdit};
use crate::parser::xml::{ElementId, XmlElement};
use crate::resources::{DocumentKind, FolderConfiguration, ResourceDocument, ResourceType, ResourceUrl};

const WIDTH: &str = "android:layout_width";
const HEIGHT: &str = "android:layout_height";

/// Tags that are not views or whose size comes from elsewhere
const EXEMPT_TAGS: &[&str] = &[
    "merge",
    "include",
    "requestFocus",
    "tag",
    "layout",
    "data",
    "variable",
    "import",
];

/// Parents that lay children out without explicit sizes
const SIZING_PARENTS: &[&str] = &["GridLayout", "TableLayout", "TableRow"];

pub fn check(context: &AnalysisContext) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (index, document) in context.project.documents.iter().enumerate() {
        if document.kind != DocumentKind::Layout {
            continue;
        }
        for (id, element) in document.xml.elements() {
            if is_exempt(document, id, element) {
                continue;
            }
            let width = has_size(context, document, id, element, WIDTH);
            let height = has_size(context, document, id, element, HEIGHT);
            if let Some(finding) = report(index, document, id, element, width, height) {
                findings.push(finding);
            }
        }
    }
    findings
}

fn is_exempt(document: &ResourceDocument, id: ElementId, element: &XmlElement) -> bool {
    if EXEMPT_TAGS.contains(&element.name.as_str()) {
        return true;
    }
    document.xml.parent(id).is_some_and(|parent| {
        let simple = parent.name.rsplit('.').next().unwrap_or(&parent.name);
        SIZING_PARENTS.contains(&simple)
    })
}

fn has_size(
    context: &AnalysisContext,
    document: &ResourceDocument,
    id: ElementId,
    element: &XmlElement,
    attribute: &str,
) -> bool {
    if element.attribute(attribute).is_some() {
        return true;
    }
    if is_view_root(document, id) && included_with(context, document, attribute) {
        return true;
    }
    let Some(style) = element.attribute_value("style") else {
        return false;
    };
    style_provides(context, style, attribute, &document.config)
}

/// The root element, or the view under a data binding `<layout>` wrapper
fn is_view_root(document: &ResourceDocument, id: ElementId) -> bool {
    let root = document.xml.root_id();
    root == Some(id)
        || (document.xml.element(id).parent == root
            && document.xml.root().is_some_and(|r| r.name == "layout"))
}

/// Every site that includes this layout could pass the size, so trust it
/// when at least one `<include>` does
fn included_with(context: &AnalysisContext, document: &ResourceDocument, attribute: &str) -> bool {
    context
        .graph
        .includes_of(&document.resource_name())
        .iter()
        .any(|site| if attribute == WIDTH { site.has_width } else { site.has_height })
}

fn style_provides(
    context: &AnalysisContext,
    style: &str,
    attribute: &str,
    file_config: &FolderConfiguration,
) -> bool {
    let style = style.trim();
    if style.starts_with('?') {
        // Theme attribute, resolved at runtime
        return true;
    }
    let Some(url) = ResourceUrl::parse(style) else {
        return false;
    };
    if url.framework {
        return true;
    }
    if url.resource_type != ResourceType::Style {
        return false;
    }
    if !context.styles.table().is_defined(&url.name) {
        // Library style we cannot see
        return true;
    }
    context.styles.holds_in_any(file_config, |config| {
        context
            .styles
            .resolve(&url.name, attribute, config)
            .is_satisfied()
    })
}

fn report(
    document_index: usize,
    document: &ResourceDocument,
    id: ElementId,
    element: &XmlElement,
    width: bool,
    height: bool,
) -> Option<Finding> {
    let (message, missing): (&str, Vec<&str>) = match (width, height) {
        (true, true) => return None,
        (false, true) => ("The required layout_width attribute is missing", vec![WIDTH]),
        (true, false) => ("The required layout_height attribute is missing", vec![HEIGHT]),
        (false, false) => (
            "The required layout_width and layout_height attributes are missing",
            vec![WIDTH, HEIGHT],
        ),
    };

    let names = missing
        .iter()
        .map(|m| m.trim_start_matches("android:"))
        .collect::<Vec<_>>()
        .join(" and ");
    let mut finding = Finding::new(
        Issue::RequiredSize,
        document.xml.location(element.name_span),
        message,
    );
    for value in ["wrap_content", "match_parent"] {
        let fix = missing.iter().fold(
            Fix::new(format!("Set {} to {}", names, value), document_index),
            |fix, attribute| {
                fix.with_edit(FixEdit::InsertAttribute {
                    element: id,
                    name: attribute.to_string(),
                    value: value.to_string(),
                })
            },
        );
        finding = finding.with_fix(fix);
    }
    Some(finding)
}
