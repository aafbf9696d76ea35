use super::table::{ParentKind, StyleNode, StyleTable};
use crate::resources::{FolderConfiguration, StyleEntry};
use tracing::trace;

/// An attribute found while walking a parent chain
#[derive(Debug, Clone, Copy)]
pub struct ResolvedAttribute<'a> {
    /// Style that declares the attribute
    pub style: &'a StyleNode,
    pub item: &'a StyleEntry,
}

#[derive(Debug, Clone)]
pub enum Resolution<'a> {
    Found(ResolvedAttribute<'a>),
    /// The chain reached a framework style; the attribute may be set there
    Framework(String),
    NotFound,
    /// Names visited before the chain came back to an earlier style
    Cycle(Vec<String>),
}

impl Resolution<'_> {
    /// Found, or deferred to a framework style
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Resolution::Found(_) | Resolution::Framework(_))
    }
}

/// Attribute lookups through style parent chains
pub struct StyleResolver<'a> {
    table: &'a StyleTable,
}

impl<'a> StyleResolver<'a> {
    pub fn new(table: &'a StyleTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a StyleTable {
        self.table
    }

    /// Walk from `style` towards the root looking for `attribute`
    pub fn resolve(&self, style: &str, attribute: &str, config: &FolderConfiguration) -> Resolution<'a> {
        let mut visited: Vec<String> = Vec::new();
        let mut current = style.to_string();

        loop {
            if visited.contains(&current) {
                visited.push(current);
                trace!("Style cycle while resolving {}: {:?}", attribute, visited);
                return Resolution::Cycle(visited);
            }
            let Some(node) = self.table.best_match(&current, config) else {
                return Resolution::NotFound;
            };
            if let Some(item) = node.item(attribute) {
                return Resolution::Found(ResolvedAttribute { style: node, item });
            }
            visited.push(current);
            current = match &node.parent {
                ParentKind::Explicit(parent) | ParentKind::Implicit(parent) => parent.clone(),
                ParentKind::Framework(parent) => return Resolution::Framework(parent.clone()),
                ParentKind::None => return Resolution::NotFound,
            };
        }
    }

    /// Plain lookup: the declaring item, if a project style declares it
    pub fn resolves_attribute(
        &self,
        style: &str,
        attribute: &str,
        config: &FolderConfiguration,
    ) -> Option<&'a StyleEntry> {
        match self.resolve(style, attribute, config) {
            Resolution::Found(found) => Some(found.item),
            _ => None,
        }
    }

    /// Configurations a file in `file_config` can be evaluated under, base first
    pub fn configurations_for(&self, file_config: &FolderConfiguration) -> Vec<FolderConfiguration> {
        let mut variants = vec![file_config.clone()];
        for config in self.table.configurations() {
            if !config.is_compatible(file_config) {
                continue;
            }
            let merged = file_config.merged(config);
            if !variants.contains(&merged) {
                variants.push(merged);
            }
        }
        variants
    }

    /// Whether `predicate` holds in at least one applicable configuration
    pub fn holds_in_any(
        &self,
        file_config: &FolderConfiguration,
        mut predicate: impl FnMut(&FolderConfiguration) -> bool,
    ) -> bool {
        self.configurations_for(file_config)
            .iter()
            .any(|config| predicate(config))
    }
}
