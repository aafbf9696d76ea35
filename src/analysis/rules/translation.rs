use crate::analysis::{AnalysisContext, Finding, Issue};
use crate::fix::{Fix, FixEdit};
use crate::resources::{DeclarationTag, Locale, ResourceItem, ResourceType};

const TRANSLATED_TYPES: [ResourceType; 3] =
    [ResourceType::String, ResourceType::Array, ResourceType::Plurals];

pub fn check(context: &AnalysisContext) -> Vec<Finding> {
    // Other locale folders are invisible when linting one file
    if context.is_single_file() {
        return Vec::new();
    }

    let mut findings = Vec::new();
    for resource_type in TRANSLATED_TYPES {
        for (name, items) in context.graph.items_of_type(resource_type) {
            match context.graph.default_definition(resource_type, name) {
                Some(default) if default.translatable => {
                    let missing = context.graph.missing_locales(resource_type, name);
                    if !missing.is_empty() {
                        findings.push(missing_translation(default, &missing));
                    }
                }
                Some(default) => {
                    findings.extend(
                        translated(items)
                            .map(|item| non_translatable(context, default, item)),
                    );
                }
                None => {
                    findings.extend(translated(items).map(|item| {
                        Finding::new(
                            Issue::ExtraTranslation,
                            item.report_location().clone(),
                            format!(
                                "\"{}\" is translated here but not found in default locale",
                                name
                            ),
                        )
                    }));
                }
            }
        }
    }
    findings
}

fn translated(items: &[ResourceItem]) -> impl Iterator<Item = &ResourceItem> {
    items.iter().filter(|item| item.config.locale().is_some())
}

fn missing_translation(default: &ResourceItem, missing: &[Locale]) -> Finding {
    let locales = missing
        .iter()
        .map(|locale| format!("\"{}\"", locale.tag()))
        .collect::<Vec<_>>()
        .join(", ");
    let finding = Finding::new(
        Issue::MissingTranslation,
        default.report_location().clone(),
        format!("\"{}\" is not translated in {}", default.name, locales),
    );
    match (default.element, default.declared_by) {
        (Some(element), DeclarationTag::Element | DeclarationTag::Item) => finding.with_fix(
            Fix::new("Mark non-translatable", default.document).with_edit(
                FixEdit::InsertAttribute {
                    element,
                    name: "translatable".into(),
                    value: "false".into(),
                },
            ),
        ),
        _ => finding,
    }
}

fn non_translatable(
    context: &AnalysisContext,
    default: &ResourceItem,
    item: &ResourceItem,
) -> Finding {
    let finding = Finding::new(
        Issue::ExtraTranslation,
        item.report_location().clone(),
        format!(
            "The resource string \"{}\" has been marked as translatable=\"false\"",
            item.name
        ),
    )
    .with_secondary(
        default.report_location().clone(),
        "Declared non-translatable here",
    );

    // Only offer the fix when the flag sits on the declaration itself
    let Some(element) = default.element else {
        return finding;
    };
    let declared_on_element = context.project.documents[default.document]
        .xml
        .element(element)
        .attribute("translatable")
        .is_some();
    if !declared_on_element {
        return finding;
    }
    finding.with_fix(
        Fix::new("Remove translatable=\"false\"", default.document).with_edit(
            FixEdit::DeleteAttribute {
                element,
                name: "translatable".into(),
            },
        ),
    )
}
