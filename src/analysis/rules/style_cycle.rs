use crate::analysis::{AnalysisContext, Finding, Issue};
use crate::location::Location;
use crate::styles::{StyleCycle, StyleNode, StyleTable};

pub fn check(context: &AnalysisContext) -> Vec<Finding> {
    let table = context.styles.table();
    table
        .cycles()
        .iter()
        .filter_map(|cycle| report(table, cycle))
        .collect()
}

fn report(table: &StyleTable, cycle: &StyleCycle) -> Option<Finding> {
    let first = cycle.members.first()?;
    let next = cycle.members.get(1).unwrap_or(first);
    let anchor = linking_node(table, first, next)?;

    if cycle.is_self_reference() {
        return Some(Finding::new(
            Issue::StyleCycle,
            parent_or_name(anchor).clone(),
            "Style should not extend itself",
        ));
    }

    let mut finding = Finding::new(
        Issue::StyleCycle,
        parent_or_name(anchor).clone(),
        format!("Style cycle: {}", cycle.chain()),
    );
    for (i, member) in cycle.members.iter().enumerate().skip(1) {
        let parent = cycle.members.get(i + 1).unwrap_or(first);
        if let Some(node) = linking_node(table, member, parent) {
            finding = finding.with_secondary(
                parent_or_name(node).clone(),
                format!("{} extends {}", member, parent),
            );
        }
    }
    Some(finding)
}

/// Definition of `name` whose parent is `parent`
fn linking_node<'a>(table: &'a StyleTable, name: &str, parent: &str) -> Option<&'a StyleNode> {
    table
        .definitions(name)
        .iter()
        .find(|node| node.parent.local_name() == Some(parent))
}

fn parent_or_name(node: &StyleNode) -> &Location {
    node.parent_location.as_ref().unwrap_or(&node.location)
}
