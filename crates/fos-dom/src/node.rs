//! DOM Node - Compact representation
//!
//! Links between nodes are [`NodeId`]s into the owning arena, so a node is
//! five 4-byte links plus its payload.

use crate::{DOMTokenList, NamedNodeMap, NodeId, StyleDeclaration};

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(data: ElementData) -> Self {
        Self::with_data(NodeData::Element(data))
    }

    /// Create a new text node
    pub fn text(content: String) -> Self {
        Self::with_data(NodeData::Text(content))
    }

    /// Create a new comment node
    pub fn comment(content: String) -> Self {
        Self::with_data(NodeData::Comment(content))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Create a doctype node
    pub fn doctype(name: String, public_id: String, system_id: String) -> Self {
        Self::with_data(NodeData::Doctype {
            name,
            public_id,
            system_id,
        })
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Whether children may be appended to this node
    #[inline]
    pub fn can_have_children(&self) -> bool {
        matches!(self.data, NodeData::Document | NodeData::Element(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// DOCTYPE
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// Element-specific data
///
/// `class` and `style` attributes are mirrored into the class list and the
/// inline style declaration; writes through either side keep both in sync.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    tag_name: String,
    attrs: NamedNodeMap,
    class_list: DOMTokenList,
    style: StyleDeclaration,
}

impl ElementData {
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    /// Lowercase tag name
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// The `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id")
    }

    /// Get an attribute value
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attrs.get(&name.to_ascii_lowercase())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attrs.contains(&name.to_ascii_lowercase())
    }

    /// Set an attribute
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "class" => self.class_list.set_value(value),
            "style" => self.style.set_css_text(value),
            _ => {}
        }
        self.attrs.set(&name, value);
    }

    /// Remove an attribute, returns whether it was present
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "class" => self.class_list.set_value(""),
            "style" => self.style.clear(),
            _ => {}
        }
        self.attrs.remove(&name).is_some()
    }

    pub fn attributes(&self) -> &NamedNodeMap {
        &self.attrs
    }

    pub fn class_list(&self) -> &DOMTokenList {
        &self.class_list
    }

    #[inline]
    pub fn has_class(&self, class: &str) -> bool {
        self.class_list.contains(class)
    }

    pub fn add_class(&mut self, class: &str) {
        self.class_list.add(&[class]);
        self.sync_class_attr();
    }

    pub fn remove_class(&mut self, class: &str) {
        self.class_list.remove(&[class]);
        self.sync_class_attr();
    }

    /// Toggle a class, returns the new state
    pub fn toggle_class(&mut self, class: &str, force: Option<bool>) -> bool {
        let state = self.class_list.toggle(class, force);
        self.sync_class_attr();
        state
    }

    /// Inline style declaration
    pub fn style(&self) -> &StyleDeclaration {
        &self.style
    }

    /// Set an inline style property; an empty value removes it
    pub fn set_style_property(&mut self, name: &str, value: &str) {
        self.style.set_property(name, value);
        self.sync_style_attr();
    }

    pub fn remove_style_property(&mut self, name: &str) -> Option<String> {
        let old = self.style.remove_property(name);
        self.sync_style_attr();
        old
    }

    fn sync_class_attr(&mut self) {
        self.attrs.set("class", &self.class_list.value());
    }

    fn sync_style_attr(&mut self) {
        if self.style.is_empty() {
            self.attrs.remove("style");
        } else {
            self.attrs.set("style", &self.style.css_text());
        }
    }
}
