//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed; a removed node is simply detached and can be
//! re-inserted later, like a DOM node held by script.

use crate::{DomError, DomResult, ElementData, Node, NodeData, NodeId};

/// Arena-based DOM tree for memory efficiency
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena, document node included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when nothing but the document node exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    // === Creation ===

    /// Create a detached element
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.push(Node::element(ElementData::new(tag_name)))
    }

    /// Create a detached element from prepared data
    pub fn create_element_with(&mut self, data: ElementData) -> NodeId {
        self.push(Node::element(data))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::text(text.to_string()))
    }

    /// Create a detached comment
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Node::comment(text.to_string()))
    }

    /// Create a detached doctype
    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.push(Node::doctype(
            name.to_string(),
            public_id.to_string(),
            system_id.to_string(),
        ))
    }

    // === Accessors ===

    /// Element data of a node, if it is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    #[inline]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_element)
    }

    /// Parent node of any kind
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Parent node, only if it is an element (`parentElement`)
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.is_element(p))
    }

    /// Iterate over direct children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let next = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        Children { tree: self, next }
    }

    /// Iterate over direct element children
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .filter(|(_, node)| node.is_element())
            .map(|(child, _)| child)
    }

    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.element_children(id).next()
    }

    /// Ancestors from the parent up, excluding `id`
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        let next = self.parent(id).unwrap_or(NodeId::NONE);
        Ancestors { tree: self, next }
    }

    /// Descendants in document (pre-)order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let next = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        Descendants {
            tree: self,
            scope: id,
            next,
        }
    }

    /// Inclusive containment check
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Whether the node is attached under the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.get(id).is_some() && self.contains(NodeId::ROOT, id)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.get(d).and_then(Node::as_text))
            .collect()
    }

    // === Mutation ===

    /// Append `child` as the last child of `parent`, moving it if attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.check_insertion(parent, child)?;
        self.unlink(child);
        self.link_before(parent, child, NodeId::NONE);
        Ok(child)
    }

    /// Insert `child` before `reference`, or append when `reference` is `None`
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        let Some(reference) = reference else {
            return self.append_child(parent, child);
        };
        self.check_insertion(parent, child)?;
        if self.parent(reference) != Some(parent) {
            return Err(DomError::NotAChild {
                parent,
                node: reference,
            });
        }
        if reference == child {
            return Ok(child);
        }
        self.unlink(child);
        self.link_before(parent, child, reference);
        Ok(child)
    }

    /// Remove `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        for id in [parent, child] {
            if self.get(id).is_none() {
                return Err(DomError::NotFound(id));
            }
        }
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild {
                parent,
                node: child,
            });
        }
        self.unlink(child);
        Ok(child)
    }

    /// Detach a node from wherever it is
    pub fn detach(&mut self, id: NodeId) {
        if self.get(id).is_some() {
            self.unlink(id);
        }
    }

    fn check_insertion(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let parent_node = self.get(parent).ok_or(DomError::NotFound(parent))?;
        let child_node = self.get(child).ok_or(DomError::NotFound(child))?;
        if matches!(child_node.data, NodeData::Document) {
            return Err(DomError::InvalidNodeType(child));
        }
        if !parent_node.can_have_children() || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    // Both ids must be valid; `reference` NONE means append
    fn link_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        let prev = if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling
        } else {
            self.nodes[parent.index()].last_child
        };

        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling = child;
        } else {
            self.nodes[parent.index()].last_child = child;
        }
    }

    fn unlink(&mut self, child: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[child.index()];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[child.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Approximate heap usage in bytes
    pub fn memory_usage(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<Node>()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Iterator over ancestors, nearest first
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.parent;
        Some(id)
    }
}

/// Pre-order iterator over a subtree, scope excluded
pub struct Descendants<'a> {
    tree: &'a DomTree,
    scope: NodeId,
    next: NodeId,
}

impl Descendants<'_> {
    fn advance(&self, current: NodeId) -> NodeId {
        let Some(node) = self.tree.get(current) else {
            return NodeId::NONE;
        };
        if node.first_child.is_valid() {
            return node.first_child;
        }

        let mut cursor = current;
        while cursor != self.scope {
            let Some(node) = self.tree.get(cursor) else {
                break;
            };
            if node.next_sibling.is_valid() {
                return node.next_sibling;
            }
            cursor = node.parent;
        }
        NodeId::NONE
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next;
        self.tree.get(current)?;
        self.next = self.advance(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        let c = tree.create_element("c");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, a).unwrap();
        tree.append_child(a, b).unwrap();
        tree.append_child(div, c).unwrap();
        (tree, div, a, b, c)
    }

    #[test]
    fn test_descendants_document_order() {
        let (tree, div, a, b, c) = sample();
        let order: Vec<_> = tree.descendants(tree.root()).collect();
        assert_eq!(order, vec![div, a, b, c]);

        let scoped: Vec<_> = tree.descendants(a).collect();
        assert_eq!(scoped, vec![b]);
    }

    #[test]
    fn test_insert_before_and_remove() {
        let (mut tree, div, a, _, c) = sample();
        let x = tree.create_element("x");
        tree.insert_before(div, x, Some(c)).unwrap();
        let kids: Vec<_> = tree.element_children(div).collect();
        assert_eq!(kids, vec![a, x, c]);

        tree.remove_child(div, x).unwrap();
        assert_eq!(tree.parent(x), None);
        assert_eq!(
            tree.remove_child(div, x),
            Err(DomError::NotAChild { parent: div, node: x })
        );
    }

    #[test]
    fn test_hierarchy_request() {
        let (mut tree, div, _, b, _) = sample();
        assert_eq!(
            tree.append_child(b, div),
            Err(DomError::HierarchyRequest { parent: b, child: div })
        );
        let text = tree.create_text("t");
        assert!(matches!(
            tree.append_child(text, b),
            Err(DomError::HierarchyRequest { .. })
        ));
        assert_eq!(
            tree.append_child(div, NodeId::ROOT),
            Err(DomError::InvalidNodeType(NodeId::ROOT))
        );
    }

    #[test]
    fn test_move_node() {
        let (mut tree, div, a, b, c) = sample();
        tree.append_child(c, b).unwrap();
        assert_eq!(tree.parent(b), Some(c));
        assert_eq!(tree.children(a).count(), 0);
        assert!(tree.contains(div, b));
    }
}
