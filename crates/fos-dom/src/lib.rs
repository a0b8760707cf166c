//! fOS DOM - Document Object Model
//!
//! Arena-backed DOM tree used as the host document for fOS Kit.
//! Nodes are addressed by [`NodeId`] and never hold pointers to each other.

mod attributes;
mod classlist;
mod document;
mod error;
mod events;
mod node;
mod style;
mod tree;

pub use attributes::{Attr, NamedNodeMap};
pub use classlist::DOMTokenList;
pub use document::{Document, ReadyState};
pub use error::{DomError, DomResult};
pub use events::{
    event_types, Event, EventInit, EventPhase, EventTarget, ListenerId, ListenerOptions,
    ListenerRegistry,
};
pub use node::{ElementData, Node, NodeData};
pub use style::{normalize_property_name, StyleDeclaration};
pub use tree::{Ancestors, Children, Descendants, DomTree};

use std::fmt;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID (the document node)
    pub const ROOT: NodeId = NodeId(0);

    /// Null link
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID points somewhere
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#none")
        }
    }
}
