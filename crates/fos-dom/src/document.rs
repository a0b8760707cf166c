//! Document - High-level document API

use std::fmt;

use crate::{DomTree, NodeId};

/// `document.readyState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    /// Still parsing
    #[default]
    Loading,
    /// Parsed, subresources pending
    Interactive,
    /// Fully loaded
    Complete,
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Loading => "loading",
            Self::Interactive => "interactive",
            Self::Complete => "complete",
        })
    }
}

/// HTML Document
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    url: String,
    ready_state: ReadyState,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a document with an empty html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Fresh nodes under fresh parents cannot violate the hierarchy
        let _ = tree.append_child(NodeId::ROOT, html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            ready_state: ReadyState::Loading,
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            ready_state: ReadyState::Loading,
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Re-locate html/head/body after the tree was built externally
    pub fn finalize(&mut self) {
        let tree = &self.tree;
        let html = tree
            .element_children(NodeId::ROOT)
            .find(|&id| tree.element(id).is_some_and(|e| e.tag_name() == "html"))
            .unwrap_or(NodeId::NONE);
        let child_named = |tag: &str| {
            tree.element_children(html)
                .find(|&id| tree.element(id).is_some_and(|e| e.tag_name() == tag))
                .unwrap_or(NodeId::NONE)
        };
        let head = child_named("head");
        let body = child_named("body");

        self.html_element = html;
        self.head_element = head;
        self.body_element = body;
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    /// Get document title
    pub fn title(&self) -> String {
        let Some(head) = self.head() else {
            return String::new();
        };
        self.tree
            .element_children(head)
            .find(|&id| self.tree.element(id).is_some_and(|e| e.tag_name() == "title"))
            .map(|title| self.tree.text_content(title).trim().to_string())
            .unwrap_or_default()
    }

    /// Get <html> element
    pub fn document_element(&self) -> Option<NodeId> {
        Some(self.html_element).filter(|id| id.is_valid())
    }

    /// Get <head> element
    pub fn head(&self) -> Option<NodeId> {
        Some(self.head_element).filter(|id| id.is_valid())
    }

    /// Get <body> element
    pub fn body(&self) -> Option<NodeId> {
        Some(self.body_element).filter(|id| id.is_valid())
    }

    /// Get connected element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(NodeId::ROOT)
            .find(|&node| self.tree.element(node).and_then(|e| e.id()) == Some(id))
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        self.tree.memory_usage() + self.url.capacity()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton() {
        let doc = Document::default();
        let html = doc.document_element().unwrap();
        assert_eq!(doc.tree().parent(doc.body().unwrap()), Some(html));
        assert_eq!(doc.ready_state(), ReadyState::Loading);
        assert_eq!(doc.url(), "about:blank");
    }

    #[test]
    fn test_finalize_and_lookup() {
        let mut doc = Document::empty("test://page");
        assert!(doc.body().is_none());

        let tree = doc.tree_mut();
        let html = tree.create_element("html");
        let body = tree.create_element("body");
        let p = tree.create_element("p");
        tree.append_child(NodeId::ROOT, html).unwrap();
        tree.append_child(html, body).unwrap();
        tree.append_child(body, p).unwrap();
        tree.element_mut(p).unwrap().set_attribute("id", "intro");

        doc.finalize();
        assert_eq!(doc.body(), Some(body));
        assert_eq!(doc.head(), None);
        assert_eq!(doc.get_element_by_id("intro"), Some(p));
        assert_eq!(doc.title(), "");
    }
}
