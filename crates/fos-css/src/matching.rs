//! Selector Matching
//!
//! Right-to-left matching of parsed selectors against the DOM tree, plus
//! the query entry points (`querySelector`, `querySelectorAll`, `closest`,
//! `matches`).

use fos_dom::{DomTree, ElementData, NodeData, NodeId};

use crate::selectors::{
    Combinator, ComplexSelector, CompoundSelector, PseudoClass, SelectorComponent, SelectorList,
};

impl SelectorList {
    /// Whether `node` matches any selector in the list
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        tree.is_element(node) && self.0.iter().any(|s| s.matches(tree, node))
    }
}

impl ComplexSelector {
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        match self.compounds.len() {
            0 => false,
            n => matches_from(tree, node, self, n - 1),
        }
    }
}

fn matches_from(tree: &DomTree, node: NodeId, selector: &ComplexSelector, index: usize) -> bool {
    if !matches_compound(tree, node, &selector.compounds[index]) {
        return false;
    }
    if index == 0 {
        return true;
    }

    let next = index - 1;
    match selector.combinators[next] {
        Combinator::Child => tree
            .parent_element(node)
            .is_some_and(|parent| matches_from(tree, parent, selector, next)),
        Combinator::Descendant => tree
            .ancestors(node)
            .filter(|&a| tree.is_element(a))
            .any(|a| matches_from(tree, a, selector, next)),
        Combinator::NextSibling => previous_element_siblings(tree, node)
            .next()
            .is_some_and(|sibling| matches_from(tree, sibling, selector, next)),
        Combinator::SubsequentSibling => previous_element_siblings(tree, node)
            .any(|sibling| matches_from(tree, sibling, selector, next)),
    }
}

fn matches_compound(tree: &DomTree, node: NodeId, compound: &CompoundSelector) -> bool {
    let Some(elem) = tree.element(node) else {
        return false;
    };
    compound
        .components
        .iter()
        .all(|component| matches_component(tree, node, elem, component))
}

fn matches_component(
    tree: &DomTree,
    node: NodeId,
    elem: &ElementData,
    component: &SelectorComponent,
) -> bool {
    match component {
        SelectorComponent::Universal => true,
        SelectorComponent::Type(tag) => elem.tag_name() == tag,
        SelectorComponent::Id(id) => elem.id() == Some(id.as_str()),
        SelectorComponent::Class(class) => elem.has_class(class),
        SelectorComponent::Attribute(attr) => attr.matches(elem.get_attribute(&attr.name)),
        SelectorComponent::PseudoClass(pseudo) => matches_pseudo_class(tree, node, elem, pseudo),
    }
}

fn matches_pseudo_class(
    tree: &DomTree,
    node: NodeId,
    elem: &ElementData,
    pseudo: &PseudoClass,
) -> bool {
    match pseudo {
        PseudoClass::Root => tree.parent(node) == Some(NodeId::ROOT),
        PseudoClass::Empty => tree
            .children(node)
            .all(|(_, child)| matches!(child.data, NodeData::Comment(_))),
        PseudoClass::FirstChild => position(tree, node, false).index == 1,
        PseudoClass::LastChild => position(tree, node, false).is_last(),
        PseudoClass::OnlyChild => position(tree, node, false).count == 1,
        PseudoClass::FirstOfType => position(tree, node, true).index == 1,
        PseudoClass::LastOfType => position(tree, node, true).is_last(),
        PseudoClass::OnlyOfType => position(tree, node, true).count == 1,
        PseudoClass::NthChild(expr) => expr.matches(position(tree, node, false).index),
        PseudoClass::NthLastChild(expr) => expr.matches(position(tree, node, false).index_from_end()),
        PseudoClass::NthOfType(expr) => expr.matches(position(tree, node, true).index),
        PseudoClass::NthLastOfType(expr) => expr.matches(position(tree, node, true).index_from_end()),
        PseudoClass::Checked => elem.has_attribute("checked") || elem.has_attribute("selected"),
        PseudoClass::Disabled => is_form_control(elem) && elem.has_attribute("disabled"),
        PseudoClass::Enabled => is_form_control(elem) && !elem.has_attribute("disabled"),
        PseudoClass::Hover | PseudoClass::Active | PseudoClass::Focus => false,
        PseudoClass::Not(list) => !list.matches(tree, node),
        PseudoClass::Is(list) | PseudoClass::Where(list) => list.matches(tree, node),
    }
}

fn is_form_control(elem: &ElementData) -> bool {
    matches!(
        elem.tag_name(),
        "button" | "input" | "select" | "textarea" | "option" | "optgroup" | "fieldset"
    )
}

/// 1-based position of an element among its element siblings
struct SiblingPosition {
    index: i32,
    count: i32,
}

impl SiblingPosition {
    fn is_last(&self) -> bool {
        self.index == self.count
    }

    fn index_from_end(&self) -> i32 {
        self.count - self.index + 1
    }
}

fn position(tree: &DomTree, node: NodeId, same_type: bool) -> SiblingPosition {
    let Some(parent) = tree.parent(node) else {
        return SiblingPosition { index: 1, count: 1 };
    };
    let tag = tree.element(node).map(ElementData::tag_name);

    let mut index = 0;
    let mut count = 0;
    for sibling in tree.element_children(parent) {
        if same_type && tree.element(sibling).map(ElementData::tag_name) != tag {
            continue;
        }
        count += 1;
        if sibling == node {
            index = count;
        }
    }
    SiblingPosition { index, count }
}

fn previous_element_siblings(tree: &DomTree, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::successors(tree.get(node).map(|n| n.prev_sibling), move |&id| {
        tree.get(id).map(|n| n.prev_sibling)
    })
    .take_while(|id| id.is_valid())
    .filter(move |&id| tree.is_element(id))
}

// ============================================================================
// QUERIES
// ============================================================================

/// First element descendant of `scope` (document order) matching `selectors`
pub fn query_selector(tree: &DomTree, scope: NodeId, selectors: &SelectorList) -> Option<NodeId> {
    tree.descendants(scope)
        .find(|&node| selectors.matches(tree, node))
}

/// All element descendants of `scope` matching `selectors`, in document order
pub fn query_selector_all(tree: &DomTree, scope: NodeId, selectors: &SelectorList) -> Vec<NodeId> {
    tree.descendants(scope)
        .filter(|&node| selectors.matches(tree, node))
        .collect()
}

/// Nearest inclusive ancestor matching `selectors`
pub fn closest(tree: &DomTree, node: NodeId, selectors: &SelectorList) -> Option<NodeId> {
    std::iter::once(node)
        .chain(tree.ancestors(node))
        .find(|&candidate| selectors.matches(tree, candidate))
}
