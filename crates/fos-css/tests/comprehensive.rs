//! Comprehensive tests for fos-css
//!
//! Tests parsing edge cases, selector matching and style computation.

use fos_css::{
    closest, parse_stylesheet, query_selector, query_selector_all, CssParser, SelectorError,
    SelectorList, StyleResolver,
};
use fos_dom::{Document, DomTree, NodeId};

fn el(tree: &mut DomTree, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let id = tree.create_element(tag);
    for (name, value) in attrs {
        tree.element_mut(id).unwrap().set_attribute(name, value);
    }
    tree.append_child(parent, id).unwrap();
    id
}

#[test]
fn test_parse_empty() {
    let stylesheet = CssParser::new().parse("").unwrap();
    assert_eq!(stylesheet.len(), 0);
    assert!(stylesheet.is_empty());
}

#[test]
fn test_parse_multiple_rules() {
    let css = r#"
        .foo { color: red; }
        .bar { background: blue; }
        #baz { display: flex; }
    "#;
    let stylesheet = CssParser::new().parse(css).unwrap();
    assert_eq!(stylesheet.len(), 3);
}

#[test]
fn test_parse_complex_selectors() {
    let css = r#"
        div.container > p.text { color: black; }
        ul li a:hover { color: blue; }
        input[type="text"] { border: 1px solid; }
        h1, h2, h3 { margin: 0; }
    "#;
    let stylesheet = CssParser::new().parse(css).unwrap();
    assert_eq!(stylesheet.len(), 4);
    assert_eq!(stylesheet.rules[3].selectors.0.len(), 3);
}

#[test]
fn test_media_rules_skipped() {
    let css = "@media print { p { color: red } } p { color: blue }";
    let stylesheet = parse_stylesheet(css).unwrap();
    assert_eq!(stylesheet.len(), 1);
}

#[test]
fn test_invalid_selectors() {
    assert_eq!(SelectorList::parse(""), Err(SelectorError::Empty));
    assert!(SelectorList::parse("##x").is_err());
    assert!(SelectorList::parse("div[").is_err());
    assert!(SelectorList::parse(":unknown-thing").is_err());
    assert!(SelectorList::parse("a,,b").is_err());
}

#[test]
fn test_query_document_order() {
    let mut tree = DomTree::new();
    let body = el(&mut tree, NodeId::ROOT, "body", &[]);
    let outer = el(&mut tree, body, "div", &[("class", "x")]);
    let inner = el(&mut tree, outer, "div", &[("class", "x")]);
    let after = el(&mut tree, body, "p", &[("class", "x")]);

    let selectors = SelectorList::parse(".x").unwrap();
    assert_eq!(query_selector(&tree, body, &selectors), Some(outer));
    assert_eq!(query_selector_all(&tree, body, &selectors), vec![outer, inner, after]);
    assert_eq!(query_selector_all(&tree, outer, &selectors), vec![inner]);
}

#[test]
fn test_attribute_operators() {
    let mut tree = DomTree::new();
    let a = el(
        &mut tree,
        NodeId::ROOT,
        "a",
        &[("href", "https://example.com/page.pdf"), ("lang", "en-US"), ("rel", "nofollow noopener")],
    );

    for selector in [
        "[href]",
        "[href^='https']",
        "[href$=\".pdf\"]",
        "[href*=example]",
        "[lang|=en]",
        "[rel~=noopener]",
        "[lang='EN-us' i]",
    ] {
        assert!(SelectorList::parse(selector).unwrap().matches(&tree, a), "{selector}");
    }
    assert!(!SelectorList::parse("[lang='EN-us']").unwrap().matches(&tree, a));
}

#[test]
fn test_closest_is_inclusive() {
    let mut tree = DomTree::new();
    let section = el(&mut tree, NodeId::ROOT, "section", &[("class", "card")]);
    let span = el(&mut tree, section, "span", &[("class", "card")]);

    let selectors = SelectorList::parse(".card").unwrap();
    assert_eq!(closest(&tree, span, &selectors), Some(span));
    assert_eq!(
        closest(&tree, span, &SelectorList::parse("section").unwrap()),
        Some(section)
    );
}

#[test]
fn test_resolver_reads_style_elements() {
    let mut doc = Document::new("test://styles");
    let head = doc.head().unwrap();
    let body = doc.body().unwrap();
    let tree = doc.tree_mut();
    let style = el(tree, head, "style", &[]);
    let css = tree.create_text("body { font-size: 20px } .big { font-size: 1.5em }");
    tree.append_child(style, css).unwrap();
    let div = el(tree, body, "div", &[("class", "big")]);

    let resolver = StyleResolver::from_document(&doc);
    assert_eq!(resolver.stylesheet_count(), 1);
    let computed = resolver.compute_style(doc.tree(), div);
    assert_eq!(computed.get("fontSize"), Some("30px"));
    assert_eq!(computed.get("display"), Some("block"));
}

#[test]
fn test_computed_style_of_text_node_is_empty() {
    let mut tree = DomTree::new();
    let text = tree.create_text("hi");
    tree.append_child(NodeId::ROOT, text).unwrap();
    assert!(StyleResolver::new().compute_style(&tree, text).is_empty());
}
