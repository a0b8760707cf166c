//! Edge case tests for fos-html
//!
//! Malformed markup, entities and unusual input.

use fos_html::{parse, parse_fragment, Document};

// ============================================================================
// MALFORMED INPUT
// ============================================================================

#[test]
fn test_parse_unclosed_tags() {
    let doc = parse("<div><p>text");
    let tree = doc.tree();
    let div = tree.first_element_child(doc.body().unwrap()).unwrap();
    let p = tree.first_element_child(div).unwrap();
    assert_eq!(tree.text_content(p), "text");
}

#[test]
fn test_parse_orphan_closing_tag() {
    let doc = parse("</span><b>x</b>");
    let b = doc.tree().first_element_child(doc.body().unwrap()).unwrap();
    assert_eq!(doc.tree().element(b).unwrap().tag_name(), "b");
}

#[test]
fn test_uppercase_tags_are_lowercased() {
    let doc = parse("<DIV ID=Main CLASS=Box></DIV>");
    let div = doc.get_element_by_id("Main").unwrap();
    let elem = doc.tree().element(div).unwrap();
    assert_eq!(elem.tag_name(), "div");
    assert!(elem.has_class("Box"));
}

// ============================================================================
// ENTITIES AND UNICODE
// ============================================================================

#[test]
fn test_parse_named_entities() {
    let doc = parse("<p>&lt;a&gt; &amp; &quot;</p>");
    let p = doc.tree().first_element_child(doc.body().unwrap()).unwrap();
    assert_eq!(doc.tree().text_content(p), "<a> & \"");
}

#[test]
fn test_parse_emoji() {
    let doc = parse("<p>héllo 🚀</p>");
    let p = doc.tree().first_element_child(doc.body().unwrap()).unwrap();
    assert_eq!(doc.tree().text_content(p), "héllo 🚀");
}

// ============================================================================
// FRAGMENTS
// ============================================================================

#[test]
fn test_fragment_empty() {
    let mut doc = Document::default();
    assert!(parse_fragment(doc.tree_mut(), "").is_empty());
    assert!(parse_fragment(doc.tree_mut(), "   ").is_empty());
}

#[test]
fn test_fragment_does_not_touch_document() {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    parse_fragment(doc.tree_mut(), "<div></div>");
    assert_eq!(doc.tree().children(body).count(), 0);
}
