//! Selector helpers

use fos_dom::NodeId;

use crate::Dom;

/// First element matching `selector` in the document
pub fn find(dom: &Dom, selector: &str) -> Option<NodeId> {
    dom.query_selector(document_container(dom), selector)
}

/// All elements matching `selector` in the document, in document order
pub fn find_all(dom: &Dom, selector: &str) -> Vec<NodeId> {
    dom.query_selector_all(document_container(dom), selector)
}

/// First element matching `selector` inside `container` (not `container` itself)
pub fn find_in(dom: &Dom, container: NodeId, selector: &str) -> Option<NodeId> {
    dom.query_selector(container, selector)
}

pub fn find_all_in(dom: &Dom, container: NodeId, selector: &str) -> Vec<NodeId> {
    dom.query_selector_all(container, selector)
}

/// Nearest element carrying `class_name`, starting at `target` itself and
/// stopping below `<body>`. `None` when the walk reaches the body or runs
/// out of parent elements.
pub fn get_parent_with_class(dom: &Dom, target: NodeId, class_name: &str) -> Option<NodeId> {
    let document = dom.document();
    let tree = document.tree();
    let body = document.body();

    let mut current = target;
    while Some(current) != body {
        let parent = tree.parent_element(current)?;
        if tree.element(current).is_some_and(|e| e.has_class(class_name)) {
            return Some(current);
        }
        current = parent;
    }
    None
}

// The one-argument forms search under the document element
fn document_container(dom: &Dom) -> NodeId {
    dom.document_element().unwrap_or(NodeId::ROOT)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <div id="menu" class="panel">
            <ul class="list"><li class="item"><a id="link">x</a></li></ul>
        </div>
        <div id="other"><li class="item">y</li></div>
    "#;

    #[test]
    fn test_find_scopes() {
        let dom = Dom::parse(PAGE);
        let menu = find(&dom, "#menu").unwrap();
        let other = find(&dom, "#other").unwrap();

        assert_eq!(find_all(&dom, ".item").len(), 2);
        assert_eq!(find_all_in(&dom, menu, ".item").len(), 1);
        assert_eq!(find_in(&dom, other, ".list"), None);
        assert_eq!(find(&dom, ".nope"), None);
    }

    #[test]
    fn test_get_parent_with_class() {
        let dom = Dom::parse(PAGE);
        let link = find(&dom, "#link").unwrap();
        let menu = find(&dom, "#menu").unwrap();
        let item = find(&dom, "li.item").unwrap();

        assert_eq!(get_parent_with_class(&dom, link, "panel"), Some(menu));
        assert_eq!(get_parent_with_class(&dom, item, "item"), Some(item));
        assert_eq!(get_parent_with_class(&dom, link, "missing"), None);
    }

    #[test]
    fn test_get_parent_with_class_never_tests_body() {
        let dom = Dom::parse(PAGE);
        let body = dom.body().unwrap();
        dom.add_class(body, "page");
        let link = find(&dom, "#link").unwrap();

        assert_eq!(get_parent_with_class(&dom, link, "page"), None);
        assert_eq!(get_parent_with_class(&dom, body, "page"), None);
    }

    #[test]
    fn test_get_parent_with_class_detached() {
        let dom = Dom::default();
        let div = dom.create_element("div");
        dom.add_class(div, "x");
        // No parent element: the walk stops before testing
        assert_eq!(get_parent_with_class(&dom, div, "x"), None);
    }
}
