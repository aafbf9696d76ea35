//! Id declarations (`@+id/...`, `<item type="id">`) kept apart from id usages

use crate::location::Location;
use crate::parser::xml::ElementId;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdDeclarationKind {
    /// `@+id/name` in a layout attribute
    Layout,
    /// `<item type="id" name="...">` in a values file
    ValuesItem,
}

#[derive(Debug, Clone)]
pub struct IdDeclaration {
    pub name: String,
    pub kind: IdDeclarationKind,
    pub document: usize,
    pub element: Option<ElementId>,
    pub location: Location,
}

/// An `@id/name` reference
#[derive(Debug, Clone)]
pub struct IdUsage {
    pub name: String,
    pub document: usize,
    pub element: ElementId,
    /// Qualified attribute name holding the reference
    pub attribute: String,
    pub location: Location,
}

impl IdUsage {
    /// Relative-layout style constraint such as `layout_below`
    pub fn is_layout_constraint(&self) -> bool {
        self.attribute
            .rsplit(':')
            .next()
            .is_some_and(|local| local.starts_with("layout_"))
    }
}

#[derive(Debug, Default, Clone)]
pub struct IdTable {
    declarations: BTreeMap<String, Vec<IdDeclaration>>,
    usages: Vec<IdUsage>,
    /// Ids set on a view through `android:id`
    assigned: HashSet<String>,
}

impl IdTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, declaration: IdDeclaration) {
        self.declarations
            .entry(declaration.name.clone())
            .or_default()
            .push(declaration);
    }

    pub fn record_usage(&mut self, usage: IdUsage) {
        self.usages.push(usage);
    }

    pub fn mark_assigned(&mut self, name: &str) {
        self.assigned.insert(name.to_string());
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    /// Declared by a view of the given document
    pub fn is_declared_in(&self, name: &str, document: usize) -> bool {
        self.declarations(name)
            .iter()
            .any(|d| d.document == document && d.kind == IdDeclarationKind::Layout)
    }

    pub fn declarations(&self, name: &str) -> &[IdDeclaration] {
        self.declarations
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn declared_names(&self) -> impl Iterator<Item = &str> {
        self.declarations.keys().map(String::as_str)
    }

    pub fn usages(&self) -> &[IdUsage] {
        &self.usages
    }

    pub fn is_assigned(&self, name: &str) -> bool {
        self.assigned.contains(name)
    }

    /// Declarations made by `<item type="id">`
    pub fn value_declarations(&self) -> impl Iterator<Item = &IdDeclaration> {
        self.declarations
            .values()
            .flatten()
            .filter(|d| d.kind == IdDeclarationKind::ValuesItem)
    }

    pub fn merge(&mut self, other: IdTable) {
        for (_, declarations) in other.declarations {
            for declaration in declarations {
                self.declare(declaration);
            }
        }
        self.usages.extend(other.usages);
        self.assigned.extend(other.assigned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{SourceText, Span};
    use std::path::PathBuf;

    fn location() -> Location {
        SourceText::new(PathBuf::from("a.xml"), "a.xml".into(), "<a/>").location(Span::new(0, 2))
    }

    #[test]
    fn test_declarations_and_assignments() {
        let mut table = IdTable::new();
        table.declare(IdDeclaration {
            name: "title".into(),
            kind: IdDeclarationKind::Layout,
            document: 3,
            element: Some(1),
            location: location(),
        });
        table.declare(IdDeclaration {
            name: "shared".into(),
            kind: IdDeclarationKind::ValuesItem,
            document: 0,
            element: Some(1),
            location: location(),
        });
        table.mark_assigned("title");

        assert!(table.is_declared("title"));
        assert!(table.is_declared_in("title", 3));
        assert!(!table.is_declared_in("title", 4));
        assert!(!table.is_declared_in("shared", 0));
        assert!(table.is_assigned("title"));
        assert_eq!(table.value_declarations().count(), 1);
    }

    #[test]
    fn test_layout_constraint_usage() {
        let usage = IdUsage {
            name: "title".into(),
            document: 0,
            element: 1,
            attribute: "android:layout_below".into(),
            location: location(),
        };
        assert!(usage.is_layout_constraint());
    }
}
