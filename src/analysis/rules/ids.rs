use crate::analysis::{AnalysisContext, Finding, Issue};
use crate::fix::{Fix, FixEdit};
use crate::resources::{DocumentKind, IdUsage, ResourceType, ResourceUrl};
use std::collections::BTreeSet;

/// Suggestions further away than this are noise
const MAX_SUGGESTION_DISTANCE: usize = 2;
const MAX_SUGGESTIONS: usize = 3;

pub fn check(context: &AnalysisContext) -> Vec<Finding> {
    let ids = context.graph.ids();
    let mut findings = Vec::new();

    for usage in ids.usages() {
        if context.is_single_file() {
            // Values folders are not visible, so an unknown id may still exist
            if !ids.is_declared(&usage.name) {
                findings.push(not_in_layout(usage));
            }
        } else if !ids.is_declared(&usage.name) {
            findings.push(unknown_id(context, usage));
        } else if usage.is_layout_constraint()
            && context.project.documents[usage.document].kind == DocumentKind::Layout
            && !visible_in_layout(context, &usage.name, usage.document)
        {
            findings.push(not_in_layout(usage));
        }
    }

    if !context.is_single_file() {
        for declaration in ids.value_declarations() {
            if !ids.is_assigned(&declaration.name) {
                findings.push(Finding::new(
                    Issue::UnassignedId,
                    declaration.location.clone(),
                    format!(
                        "The id \"{}\" is declared but never assigned to a view",
                        declaration.name
                    ),
                ));
            }
        }
    }
    findings
}

fn not_in_layout(usage: &IdUsage) -> Finding {
    Finding::new(
        Issue::UnknownIdInLayout,
        usage.location.clone(),
        format!(
            "The id \"{}\" is not referring to any views in this layout",
            usage.name
        ),
    )
}

fn unknown_id(context: &AnalysisContext, usage: &IdUsage) -> Finding {
    let suggestions = similar_ids(context, &usage.name);
    let mut message = format!("The id \"{}\" is not defined anywhere.", usage.name);
    if !suggestions.is_empty() {
        message.push_str(&format!(" Did you mean one of {{{}}} ?", suggestions.join(", ")));
    }

    let mut finding = Finding::new(Issue::UnknownId, usage.location.clone(), message)
        .with_fix(replace_value(
            usage,
            format!("Change to @+id/{}", usage.name),
            format!("@+id/{}", usage.name),
        ));
    for suggestion in &suggestions {
        finding = finding.with_fix(replace_value(
            usage,
            format!("Replace with @id/{}", suggestion),
            format!("@id/{}", suggestion),
        ));
    }
    finding
}

fn replace_value(usage: &IdUsage, description: String, value: String) -> Fix {
    Fix::new(description, usage.document).with_edit(FixEdit::ReplaceAttributeValue {
        element: usage.element,
        name: usage.attribute.clone(),
        value,
    })
}

/// Declared in the layout itself or in a layout it includes
fn visible_in_layout(context: &AnalysisContext, name: &str, document: usize) -> bool {
    let ids = context.graph.ids();
    let mut pending = vec![document];
    let mut seen = BTreeSet::new();
    while let Some(current) = pending.pop() {
        if !seen.insert(current) {
            continue;
        }
        if ids.is_declared_in(name, current) {
            return true;
        }
        let xml = &context.project.documents[current].xml;
        for (_, element) in xml.elements() {
            if element.name != "include" {
                continue;
            }
            let Some(url) = element.attribute_value("layout").and_then(ResourceUrl::parse) else {
                continue;
            };
            if url.resource_type == ResourceType::Layout {
                pending.extend_from_slice(context.graph.layout_documents(&url.name));
            }
        }
    }
    false
}

/// Closest declared ids by edit distance, nearest first
fn similar_ids(context: &AnalysisContext, name: &str) -> Vec<String> {
    let mut candidates: Vec<(usize, &str)> = context
        .graph
        .ids()
        .declared_names()
        .map(|candidate| (edit_distance(name, candidate), candidate))
        .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
        .collect();
    candidates.sort();
    candidates
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut current = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        previous = current;
    }
    previous[b.len()]
}
