//! fOS HTML Parser
//!
//! HTML5 parser built on html5ever, producing the arena DOM of fos-dom.

mod parser;

pub use fos_dom::Document;
pub use parser::HtmlParser;

use fos_dom::{DomTree, NodeId};

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html)
}

/// Parse markup into detached nodes owned by `tree`
pub fn parse_fragment(tree: &mut DomTree, html: &str) -> Vec<NodeId> {
    HtmlParser::new().parse_fragment(tree, html)
}
