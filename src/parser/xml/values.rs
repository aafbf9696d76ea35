use super::{ElementId, XmlDocument, XmlElement};
use crate::resources::{
    DeclarationTag, FolderConfiguration, IdDeclaration, IdDeclarationKind, ResourceItem,
    ResourceType, ResourceValue, StyleEntry,
};
use tracing::{debug, trace};

/// Declarations found in one `res/values*/` file
#[derive(Debug, Default)]
pub struct ValuesExtraction {
    pub items: Vec<ResourceItem>,
    pub ids: Vec<IdDeclaration>,
}

/// Parser for `<resources>` files
pub struct ValuesParser<'a> {
    doc: &'a XmlDocument,
    document: usize,
    config: &'a FolderConfiguration,
}

impl<'a> ValuesParser<'a> {
    pub fn new(doc: &'a XmlDocument, document: usize, config: &'a FolderConfiguration) -> Self {
        Self {
            doc,
            document,
            config,
        }
    }

    pub fn parse(&self) -> ValuesExtraction {
        let mut result = ValuesExtraction::default();
        let Some(root_id) = self.doc.root_id() else {
            return result;
        };
        let root = self.doc.element(root_id);
        if root.name != "resources" {
            debug!(
                "Skipping {}: root element is <{}>",
                self.doc.display_path(),
                root.name
            );
            return result;
        }

        let file_translatable = root.attribute_value("translatable") != Some("false")
            && !self.is_donottranslate_file();

        for (id, element) in self.doc.children(root_id) {
            self.parse_declaration(id, element, file_translatable, &mut result);
        }

        trace!(
            "Values {}: {} items, {} ids",
            self.doc.display_path(),
            result.items.len(),
            result.ids.len()
        );
        result
    }

    fn is_donottranslate_file(&self) -> bool {
        self.doc
            .source()
            .path()
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("donottranslate"))
    }

    fn parse_declaration(
        &self,
        id: ElementId,
        element: &XmlElement,
        file_translatable: bool,
        result: &mut ValuesExtraction,
    ) {
        let Some(name_attr) = element.attribute("name") else {
            return;
        };
        let name = name_attr.value.clone();
        let location = self.doc.location(element.name_span);
        let name_location = Some(self.doc.location(name_attr.value_span));

        let (resource_type, declared_by) = match element.name.as_str() {
            "item" => {
                let Some(resource_type) = element
                    .attribute_value("type")
                    .and_then(ResourceType::from_name)
                else {
                    return;
                };
                (resource_type, DeclarationTag::Item)
            }
            "id" => (ResourceType::Id, DeclarationTag::Element),
            tag => match ResourceType::from_values_tag(tag) {
                Some(resource_type) => (resource_type, DeclarationTag::Element),
                None => return,
            },
        };

        if resource_type == ResourceType::Id {
            result.ids.push(IdDeclaration {
                name: name.clone(),
                kind: IdDeclarationKind::ValuesItem,
                document: self.document,
                element: Some(id),
                location: name_location.clone().unwrap_or_else(|| location.clone()),
            });
        }

        let translatable = match element.attribute_value("translatable") {
            Some("false") => false,
            Some("true") => true,
            _ => file_translatable && element.name != "integer-array",
        };

        let value = match resource_type {
            ResourceType::Style => self.style_value(id, element),
            ResourceType::Array | ResourceType::Plurals => ResourceValue::Items(
                self.doc
                    .children(id)
                    .filter(|(_, child)| child.name == "item")
                    .map(|(_, child)| child.text.trim().to_string())
                    .collect(),
            ),
            ResourceType::Id => ResourceValue::None,
            _ => ResourceValue::Text(element.text.clone()),
        };

        result.items.push(ResourceItem {
            resource_type,
            name,
            config: self.config.clone(),
            value,
            location,
            name_location,
            translatable,
            declared_by,
            document: self.document,
            element: Some(id),
        });
    }

    fn style_value(&self, id: ElementId, element: &XmlElement) -> ResourceValue {
        let parent_attr = element.attribute("parent");
        let items = self
            .doc
            .children(id)
            .filter(|(_, child)| child.name == "item")
            .filter_map(|(_, child)| {
                let name = child.attribute("name")?;
                Some(StyleEntry {
                    name: name.value.clone(),
                    value: child.text.trim().to_string(),
                    location: self.doc.location(name.value_span),
                })
            })
            .collect();

        ResourceValue::Style {
            parent: parent_attr.map(|a| a.value.trim().to_string()),
            parent_location: parent_attr.map(|a| self.doc.location(a.value_span)),
            items,
        }
    }
}
