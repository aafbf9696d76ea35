//! Normalized resource model
//!
//! The [`ResourceGraph`] aggregates every declaration of every resource
//! across configuration folders, together with the [`IdTable`], the layout
//! index used to follow `<include>` and the analysis scope. It is built once
//! per pass from a loaded [`Project`] and is read-only afterwards.

mod configuration;
mod ids;
mod item;
mod project;

pub use configuration::{Dimension, FolderConfiguration, Locale};
pub use ids::{IdDeclaration, IdDeclarationKind, IdTable, IdUsage};
pub use item::{
    DeclarationTag, ResourceItem, ResourceType, ResourceUrl, ResourceValue, StyleEntry,
};
pub use project::{
    AnalysisScope, DocumentKind, LoadError, ParseFailure, Project, ProjectLoader,
    ResourceDocument,
};

use crate::parser::xml::{IncludeSite, LayoutParser, ValuesParser};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Extraction results of one document, merged in document order
#[derive(Default)]
struct DocumentResources {
    items: Vec<ResourceItem>,
    ids: IdTable,
    includes: Vec<IncludeSite>,
}

#[derive(Debug, Clone)]
pub struct ResourceGraph {
    items: BTreeMap<(ResourceType, String), Vec<ResourceItem>>,
    ids: IdTable,
    layouts: HashMap<String, Vec<usize>>,
    includes: HashMap<String, Vec<IncludeSite>>,
    scope: AnalysisScope,
}

impl ResourceGraph {
    pub fn build(project: &Project) -> Self {
        let extracted: Vec<DocumentResources> = project
            .documents
            .par_iter()
            .enumerate()
            .map(|(index, document)| extract(index, document))
            .collect();

        let mut graph = Self {
            items: BTreeMap::new(),
            ids: IdTable::new(),
            layouts: HashMap::new(),
            includes: HashMap::new(),
            scope: project.scope.clone(),
        };

        for (index, resources) in extracted.into_iter().enumerate() {
            let document = &project.documents[index];
            if document.kind == DocumentKind::Layout {
                graph
                    .layouts
                    .entry(document.resource_name())
                    .or_default()
                    .push(index);
            }
            for item in resources.items {
                graph.add(item);
            }
            graph.ids.merge(resources.ids);
            for include in resources.includes {
                graph
                    .includes
                    .entry(include.layout.clone())
                    .or_default()
                    .push(include);
            }
        }

        debug!(
            "Resource graph: {} resources, {} ids, {} layouts",
            graph.items.len(),
            graph.ids.declared_names().count(),
            graph.layouts.len()
        );
        graph
    }

    pub fn add(&mut self, item: ResourceItem) {
        self.items
            .entry((item.resource_type, item.name.clone()))
            .or_default()
            .push(item);
    }

    pub fn scope(&self) -> &AnalysisScope {
        &self.scope
    }

    pub fn ids(&self) -> &IdTable {
        &self.ids
    }

    /// Defined in any configuration
    pub fn is_defined(&self, resource_type: ResourceType, name: &str) -> bool {
        !self.definitions(resource_type, name).is_empty()
    }

    /// Defined in a folder without a locale qualifier
    pub fn is_defined_in_default(&self, resource_type: ResourceType, name: &str) -> bool {
        self.default_definition(resource_type, name).is_some()
    }

    /// All declarations in file order
    pub fn definitions(&self, resource_type: ResourceType, name: &str) -> &[ResourceItem] {
        self.items
            .get(&(resource_type, name.to_string()))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The unqualified declaration if any, else the first one without a locale
    pub fn default_definition(&self, resource_type: ResourceType, name: &str) -> Option<&ResourceItem> {
        let definitions = self.definitions(resource_type, name);
        definitions
            .iter()
            .find(|item| item.config.is_default())
            .or_else(|| definitions.iter().find(|item| item.config.locale().is_none()))
    }

    pub fn items_of_type(
        &self,
        resource_type: ResourceType,
    ) -> impl Iterator<Item = (&str, &[ResourceItem])> {
        self.items
            .range((resource_type, String::new())..)
            .take_while(move |((t, _), _)| *t == resource_type)
            .map(|((_, name), items)| (name.as_str(), items.as_slice()))
    }

    /// Every locale for which at least one string is defined
    pub fn locales(&self) -> BTreeSet<Locale> {
        self.items_of_type(ResourceType::String)
            .flat_map(|(_, items)| items.iter())
            .filter_map(|item| item.config.locale().cloned())
            .collect()
    }

    /// Project locales with no declaration covering them, in locale order
    pub fn missing_locales(&self, resource_type: ResourceType, name: &str) -> Vec<Locale> {
        let definitions = self.definitions(resource_type, name);
        self.locales()
            .into_iter()
            .filter(|locale| {
                !definitions.iter().any(|item| {
                    item.config
                        .locale()
                        .is_some_and(|defined| covers(defined, locale))
                })
            })
            .collect()
    }

    /// Documents of the layout named `name` across configurations
    pub fn layout_documents(&self, name: &str) -> &[usize] {
        self.layouts.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// `<include>` sites that pull in the layout `name`
    pub fn includes_of(&self, name: &str) -> &[IncludeSite] {
        self.includes.get(name).map(Vec::as_slice).unwrap_or_default()
    }
}

/// `de` covers `de-rAT`; `de-rDE` does not cover `de`
fn covers(defined: &Locale, wanted: &Locale) -> bool {
    defined.language == wanted.language
        && (defined.region.is_none() || defined.region == wanted.region)
        && (defined.script.is_none() || defined.script == wanted.script)
}

fn extract(index: usize, document: &ResourceDocument) -> DocumentResources {
    let mut resources = DocumentResources::default();
    match document.kind {
        DocumentKind::Values => {
            let values = ValuesParser::new(&document.xml, index, &document.config).parse();
            resources.items = values.items;
            for id in values.ids {
                resources.ids.declare(id);
            }
        }
        DocumentKind::Layout | DocumentKind::Other => {
            if let Some(item) = document.file_item(index) {
                resources.items.push(item);
            }
            let layout = LayoutParser::new(&document.xml, index).parse();
            for id in layout.ids {
                resources.ids.declare(id);
            }
            for usage in layout.usages {
                resources.ids.record_usage(usage);
            }
            for name in &layout.assigned {
                resources.ids.mark_assigned(name);
            }
            if document.kind == DocumentKind::Layout {
                resources.includes = layout.includes;
            }
        }
    }
    resources
}
