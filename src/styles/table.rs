use crate::location::Location;
use crate::resources::{FolderConfiguration, ResourceGraph, ResourceType, ResourceValue, StyleEntry};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// How a style names its parent, resolved once when the table is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentKind {
    /// `parent="@style/X"` or `parent="X"`
    Explicit(String),
    /// No `parent` attribute; nearest defined dotted prefix of the name
    Implicit(String),
    /// `parent="@android:style/X"`; opaque
    Framework(String),
    /// `parent=""`, or no parent and no defined prefix
    None,
}

impl ParentKind {
    /// Name of a project style this one inherits from
    pub fn local_name(&self) -> Option<&str> {
        match self {
            ParentKind::Explicit(name) | ParentKind::Implicit(name) => Some(name),
            ParentKind::Framework(_) | ParentKind::None => None,
        }
    }
}

/// One `<style>` definition in one configuration
#[derive(Debug, Clone)]
pub struct StyleNode {
    pub name: String,
    pub config: FolderConfiguration,
    pub parent: ParentKind,
    pub items: Vec<StyleEntry>,
    pub location: Location,
    pub parent_location: Option<Location>,
    pub document: usize,
}

impl StyleNode {
    pub fn item(&self, attribute: &str) -> Option<&StyleEntry> {
        self.items.iter().find(|item| item.name == attribute)
    }
}

/// A cycle among project styles, in parent order starting at its smallest name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleCycle {
    pub members: Vec<String>,
}

impl StyleCycle {
    pub fn is_self_reference(&self) -> bool {
        self.members.len() == 1
    }

    /// `A -> B -> A`
    pub fn chain(&self) -> String {
        let mut chain = self.members.clone();
        if let Some(first) = self.members.first() {
            chain.push(first.clone());
        }
        chain.join(" -> ")
    }
}

#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    styles: BTreeMap<String, Vec<StyleNode>>,
    configurations: Vec<FolderConfiguration>,
}

impl StyleTable {
    pub fn build(graph: &ResourceGraph) -> Self {
        let names: BTreeSet<&str> = graph
            .items_of_type(ResourceType::Style)
            .map(|(name, _)| name)
            .collect();
        let mut table = Self::default();

        for (name, items) in graph.items_of_type(ResourceType::Style) {
            let nodes: Vec<StyleNode> = items
                .iter()
                .filter_map(|item| {
                    let ResourceValue::Style {
                        parent,
                        parent_location,
                        items,
                    } = &item.value
                    else {
                        return None;
                    };
                    let parent = match parent {
                        Some(parent) => parse_parent(parent),
                        None => implicit_parent(&names, name),
                    };
                    Some(StyleNode {
                        name: name.to_string(),
                        config: item.config.clone(),
                        parent,
                        items: items.clone(),
                        location: item.report_location().clone(),
                        parent_location: parent_location.clone(),
                        document: item.document,
                    })
                })
                .collect();
            for node in &nodes {
                if !table.configurations.contains(&node.config) {
                    table.configurations.push(node.config.clone());
                }
            }
            table.styles.insert(name.to_string(), nodes);
        }

        table
            .configurations
            .sort_by_key(|config| (config.specificity(), config.clone()));
        debug!(
            "Style table: {} styles in {} configurations",
            table.styles.len(),
            table.configurations.len()
        );
        table
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    pub fn definitions(&self, name: &str) -> &[StyleNode] {
        self.styles.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn styles(&self) -> impl Iterator<Item = &StyleNode> {
        self.styles.values().flatten()
    }

    /// Distinct configurations that define styles, least specific first
    pub fn configurations(&self) -> &[FolderConfiguration] {
        &self.configurations
    }

    /// Most specific definition whose configuration matches the query
    pub fn best_match(&self, name: &str, query: &FolderConfiguration) -> Option<&StyleNode> {
        self.definitions(name)
            .iter()
            .filter(|node| node.config.matches(query))
            .max_by_key(|node| node.config.specificity())
    }

    /// Every cycle in the name-level parent graph, self references included
    pub fn cycles(&self) -> Vec<StyleCycle> {
        let mut graph: DiGraph<&str, ()> = DiGraph::new();
        let indices: HashMap<&str, NodeIndex> = self
            .styles
            .keys()
            .map(|name| (name.as_str(), graph.add_node(name.as_str())))
            .collect();

        for node in self.styles() {
            if let Some(parent) = node.parent.local_name() {
                if let (Some(&from), Some(&to)) =
                    (indices.get(node.name.as_str()), indices.get(parent))
                {
                    if !graph.contains_edge(from, to) {
                        graph.add_edge(from, to, ());
                    }
                }
            }
        }

        let mut cycles: Vec<StyleCycle> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let members: Vec<&str> = scc.iter().map(|&index| graph[index]).collect();
                StyleCycle {
                    members: self.walk_cycle(&members),
                }
            })
            .collect();
        cycles.sort_by(|a, b| a.members.cmp(&b.members));
        cycles
    }

    /// Order the members of a strongly connected component by following parents
    fn walk_cycle(&self, members: &[&str]) -> Vec<String> {
        let Some(start) = members.iter().min().copied() else {
            return Vec::new();
        };
        let mut chain = vec![start.to_string()];
        let mut current = start;
        loop {
            let next = self
                .definitions(current)
                .iter()
                .filter_map(|node| node.parent.local_name())
                .find(|parent| members.contains(parent));
            match next {
                Some(next) if next != start && !chain.iter().any(|m| m == next) => {
                    chain.push(next.to_string());
                    current = next;
                }
                _ => break,
            }
        }
        chain
    }
}

/// Nearest dotted prefix of `name` that is itself a defined style
fn implicit_parent(names: &BTreeSet<&str>, name: &str) -> ParentKind {
    let mut prefix = name;
    while let Some((head, _)) = prefix.rsplit_once('.') {
        if names.contains(head) {
            return ParentKind::Implicit(head.to_string());
        }
        prefix = head;
    }
    ParentKind::None
}

/// Classify a `parent` attribute value
pub fn parse_parent(value: &str) -> ParentKind {
    let value = value.trim();
    if value.is_empty() {
        return ParentKind::None;
    }
    let framework = ["@android:style/", "@*android:style/", "android:style/", "android:"];
    for prefix in framework {
        if let Some(name) = value.strip_prefix(prefix) {
            return ParentKind::Framework(name.to_string());
        }
    }
    let name = value
        .strip_prefix("@style/")
        .or_else(|| value.strip_prefix("style/"))
        .unwrap_or(value);
    ParentKind::Explicit(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_parent() {
        assert_eq!(parse_parent("@style/Base"), ParentKind::Explicit("Base".into()));
        assert_eq!(parse_parent("Base.Child"), ParentKind::Explicit("Base.Child".into()));
        assert_eq!(
            parse_parent("@android:style/Theme.Light"),
            ParentKind::Framework("Theme.Light".into())
        );
        assert_eq!(
            parse_parent("android:Widget.Button"),
            ParentKind::Framework("Widget.Button".into())
        );
        assert_eq!(parse_parent(""), ParentKind::None);
    }

    #[test]
    fn test_cycle_chain_rendering() {
        let cycle = StyleCycle {
            members: vec!["A".into(), "B".into()],
        };
        assert_eq!(cycle.chain(), "A -> B -> A");
        assert!(!cycle.is_self_reference());
    }
}
