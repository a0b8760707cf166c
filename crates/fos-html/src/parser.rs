//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it into the arena DOM.

use fos_dom::{Document, DomTree, ElementData, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Document {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut document = Document::empty(url);
        let tree = document.tree_mut();
        for child in dom.document.children.borrow().iter() {
            if let Some(id) = self.convert_node(child, tree) {
                // Fresh nodes under the document node cannot violate the hierarchy
                let _ = tree.append_child(NodeId::ROOT, id);
            }
        }

        // Find html, head, body elements
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        document
    }

    /// Parse markup into detached nodes owned by `tree`.
    ///
    /// The markup is parsed as a document body; nodes the parser hoists into
    /// `<head>` (`<style>`, `<meta>`, ...) come first, then body content.
    pub fn parse_fragment(&self, tree: &mut DomTree, html: &str) -> Vec<NodeId> {
        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let html_element = dom
            .document
            .children
            .borrow()
            .iter()
            .find(|h| element_name(h) == Some("html"))
            .cloned();
        let Some(html_element) = html_element else {
            return Vec::new();
        };

        let mut nodes = Vec::new();
        for section in html_element.children.borrow().iter() {
            if !matches!(element_name(section), Some("head" | "body")) {
                continue;
            }
            for child in section.children.borrow().iter() {
                nodes.extend(self.convert_node(child, tree));
            }
        }

        tracing::debug!("Parsed fragment into {} top-level nodes", nodes.len());
        nodes
    }

    /// Convert an RcDom node (and its subtree) into a detached arena node
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree) -> Option<NodeId> {
        let id = match &handle.data {
            RcNodeData::Document | RcNodeData::ProcessingInstruction { .. } => return None,
            RcNodeData::Doctype {
                name,
                public_id,
                system_id,
            } => tree.create_doctype(name, public_id, system_id),
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if text.trim().is_empty() {
                    return None;
                }
                tree.create_text(&text)
            }
            RcNodeData::Comment { contents } => tree.create_comment(contents),
            RcNodeData::Element { name, attrs, .. } => {
                let mut elem = ElementData::new(&name.local);
                for attr in attrs.borrow().iter() {
                    elem.set_attribute(&attr.name.local, &attr.value);
                }
                tree.create_element_with(elem)
            }
        };

        for child in handle.children.borrow().iter() {
            if let Some(child_id) = self.convert_node(child, tree) {
                let _ = tree.append_child(id, child_id);
            }
        }
        Some(id)
    }
}

fn element_name(handle: &Handle) -> Option<&str> {
    match &handle.data {
        RcNodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html);

        assert!(doc.body().is_some());
        assert_eq!(doc.title(), "Test");
    }

    #[test]
    fn test_parse_fragment_detached() {
        let mut doc = Document::default();
        let nodes = HtmlParser::new().parse_fragment(doc.tree_mut(), "<div><span>Text</span></div>");

        assert_eq!(nodes.len(), 1);
        let tree = doc.tree();
        assert_eq!(tree.element(nodes[0]).unwrap().tag_name(), "div");
        assert_eq!(tree.parent(nodes[0]), None);
        assert_eq!(tree.text_content(nodes[0]), "Text");
    }
}
