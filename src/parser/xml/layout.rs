use super::{ElementId, XmlDocument};
use crate::resources::{IdDeclaration, IdDeclarationKind, IdUsage, ResourceType, ResourceUrl};
use tracing::debug;

/// An `<include layout="@layout/...">` site
#[derive(Debug, Clone)]
pub struct IncludeSite {
    pub layout: String,
    pub document: usize,
    pub element: ElementId,
    pub has_width: bool,
    pub has_height: bool,
}

/// Ids and includes found in one layout file
#[derive(Debug, Default)]
pub struct LayoutExtraction {
    pub ids: Vec<IdDeclaration>,
    pub usages: Vec<IdUsage>,
    /// Ids set through `android:id`
    pub assigned: Vec<String>,
    pub includes: Vec<IncludeSite>,
}

/// Parser for Android layout XML files
pub struct LayoutParser<'a> {
    doc: &'a XmlDocument,
    document: usize,
}

impl<'a> LayoutParser<'a> {
    pub fn new(doc: &'a XmlDocument, document: usize) -> Self {
        Self { doc, document }
    }

    pub fn parse(&self) -> LayoutExtraction {
        let mut result = LayoutExtraction::default();

        for (id, element) in self.doc.elements() {
            if element.name == "include" {
                if let Some(url) = element
                    .attribute_value("layout")
                    .and_then(ResourceUrl::parse)
                    .filter(|url| url.resource_type == ResourceType::Layout)
                {
                    result.includes.push(IncludeSite {
                        layout: url.name,
                        document: self.document,
                        element: id,
                        has_width: element.android_attribute("layout_width").is_some(),
                        has_height: element.android_attribute("layout_height").is_some(),
                    });
                }
            }

            for attr in &element.attributes {
                let Some(url) = ResourceUrl::parse(&attr.value) else {
                    continue;
                };
                if url.resource_type != ResourceType::Id || url.framework {
                    continue;
                }
                let location = self.doc.location(attr.value_span);
                if attr.is_android("id") {
                    result.assigned.push(url.name.clone());
                }
                if url.create {
                    result.ids.push(IdDeclaration {
                        name: url.name,
                        kind: IdDeclarationKind::Layout,
                        document: self.document,
                        element: Some(id),
                        location,
                    });
                } else {
                    result.usages.push(IdUsage {
                        name: url.name,
                        document: self.document,
                        element: id,
                        attribute: attr.name.clone(),
                        location,
                    });
                }
            }
        }

        debug!(
            "Parsed layout {}: {} id declarations, {} id references, {} includes",
            self.doc.display_path(),
            result.ids.len(),
            result.usages.len(),
            result.includes.len()
        );

        result
    }
}
