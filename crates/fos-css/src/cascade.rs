//! Style Cascade & Resolver
//!
//! Computes the final styles for DOM elements by:
//! 1. Inheriting from the parent's computed style
//! 2. Matching selectors against elements
//! 3. Sorting by importance, specificity and source order
//! 4. Layering the inline `style` attribute on top

use std::collections::HashMap;

use fos_dom::{normalize_property_name, Document, DomTree, NodeId};

use crate::properties::{
    self, default_display, format_px, initial_value, is_inherited, resolve_font_size,
    DEFAULT_FONT_SIZE_PX,
};
use crate::{CssParser, Declaration, Specificity, Stylesheet};

/// Computed style of one element, keyed by kebab-case property name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedStyle {
    properties: HashMap<String, String>,
}

impl ComputedStyle {
    /// Computed value; accepts `font-size` or `fontSize`
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties
            .get(&normalize_property_name(property))
            .map(String::as_str)
    }

    /// `getPropertyValue`: empty string when unset
    pub fn get_property_value(&self, property: &str) -> &str {
        self.get(property).unwrap_or("")
    }

    /// Resolved font size in pixels
    pub fn font_size_px(&self) -> f64 {
        self.get("font-size")
            .and_then(properties::split_dimension)
            .map_or(DEFAULT_FONT_SIZE_PX, |(px, _)| px)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn set(&mut self, property: &str, value: &str) {
        self.properties.insert(property.to_string(), value.to_string());
    }
}

/// Style resolver - computes styles for DOM elements
#[derive(Debug, Default)]
pub struct StyleResolver {
    /// Author stylesheets (page CSS), in document order
    author_styles: Vec<Stylesheet>,
}

impl StyleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every `<style>` element of the document.
    ///
    /// Sheets that fail to parse are skipped.
    pub fn from_document(document: &Document) -> Self {
        let tree = document.tree();
        let parser = CssParser::new();
        let mut resolver = Self::new();

        for node in tree.descendants(NodeId::ROOT) {
            if tree.element(node).is_none_or(|e| e.tag_name() != "style") {
                continue;
            }
            match parser.parse(&tree.text_content(node)) {
                Ok(sheet) => resolver.add_stylesheet(sheet),
                Err(err) => tracing::warn!(%node, error = %err, "Ignoring invalid <style> sheet"),
            }
        }
        resolver
    }

    /// Add an author stylesheet
    pub fn add_stylesheet(&mut self, stylesheet: Stylesheet) {
        self.author_styles.push(stylesheet);
    }

    pub fn stylesheet_count(&self) -> usize {
        self.author_styles.len()
    }

    /// Compute styles for an element, resolving its ancestors first
    pub fn compute_style(&self, tree: &DomTree, node_id: NodeId) -> ComputedStyle {
        if !tree.is_element(node_id) {
            return ComputedStyle::default();
        }

        let mut chain: Vec<NodeId> = std::iter::once(node_id)
            .chain(tree.ancestors(node_id))
            .filter(|&id| tree.is_element(id))
            .collect();
        chain.reverse();

        let mut parent: Option<ComputedStyle> = None;
        let mut root_px = DEFAULT_FONT_SIZE_PX;
        for (depth, &element) in chain.iter().enumerate() {
            let style = self.compute_single(tree, element, parent.as_ref(), root_px);
            if depth == 0 {
                root_px = style.font_size_px();
            }
            parent = Some(style);
        }
        parent.unwrap_or_default()
    }

    fn compute_single(
        &self,
        tree: &DomTree,
        node_id: NodeId,
        parent: Option<&ComputedStyle>,
        root_px: f64,
    ) -> ComputedStyle {
        let mut style = ComputedStyle::default();
        let Some(elem) = tree.element(node_id) else {
            return style;
        };

        for (property, value) in properties::INITIAL_VALUES {
            style.set(property, value);
        }
        style.set("display", default_display(elem.tag_name()));
        if let Some(parent) = parent {
            for (property, value) in parent.iter() {
                if is_inherited(property) {
                    style.set(property, value);
                }
            }
        }

        // Collect all matching declarations with specificity and source order
        let mut matches: Vec<(&Declaration, Specificity, usize)> = Vec::new();
        let mut order = 0;
        for sheet in &self.author_styles {
            for rule in &sheet.rules {
                order += 1;
                let matching = rule
                    .selectors
                    .iter()
                    .filter(|s| s.matches(tree, node_id))
                    .map(|s| s.specificity())
                    .max();
                if let Some(specificity) = matching {
                    matches.extend(rule.declarations.iter().map(|d| (d, specificity, order)));
                }
            }
        }
        matches.sort_by_key(|(decl, specificity, order)| (decl.important, *specificity, *order));

        let (important, normal): (Vec<_>, Vec<_>) =
            matches.into_iter().partition(|(decl, _, _)| decl.important);

        // Normal rules, then inline style, then !important rules
        let specified = normal
            .iter()
            .map(|(decl, _, _)| (decl.property.as_str(), decl.value.as_str()))
            .chain(elem.style().iter())
            .chain(
                important
                    .iter()
                    .map(|(decl, _, _)| (decl.property.as_str(), decl.value.as_str())),
            );

        let mut font_size: Option<String> = None;
        for (property, value) in specified {
            let value = value.trim_end_matches("!important").trim();
            let resolved = match value.to_ascii_lowercase().as_str() {
                "inherit" => parent.and_then(|p| p.get(property)).map(str::to_string),
                "initial" => initial_value(property).map(str::to_string),
                "unset" if is_inherited(property) => {
                    parent.and_then(|p| p.get(property)).map(str::to_string)
                }
                "unset" => initial_value(property).map(str::to_string),
                _ => Some(value.to_string()),
            };
            match resolved {
                Some(v) if property == "font-size" => font_size = Some(v),
                Some(v) => style.set(property, &v),
                None => {
                    style.properties.remove(property);
                }
            }
        }

        let parent_px = parent.map_or(DEFAULT_FONT_SIZE_PX, ComputedStyle::font_size_px);
        // The root element resolves rem against the initial size
        let root_px = if parent.is_some() { root_px } else { DEFAULT_FONT_SIZE_PX };
        let px = match font_size {
            Some(specified) => resolve_font_size(&specified, parent_px, root_px),
            None => parent_px,
        };
        style.set("font-size", &format_px(px));

        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_stylesheet;

    fn build() -> (DomTree, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let p = tree.create_element("p");
        tree.append_child(NodeId::ROOT, html).unwrap();
        tree.append_child(html, p).unwrap();
        (tree, html, p)
    }

    #[test]
    fn test_specificity_and_order() {
        let (mut tree, _, p) = build();
        tree.element_mut(p).unwrap().set_attribute("class", "note");

        let mut resolver = StyleResolver::new();
        resolver.add_stylesheet(
            parse_stylesheet(".note { color: red } p { color: blue } p { margin-top: 1px } p { margin-top: 2px }")
                .unwrap(),
        );
        let style = resolver.compute_style(&tree, p);
        assert_eq!(style.get("color"), Some("red"));
        assert_eq!(style.get("marginTop"), Some("2px"));
        assert_eq!(style.get("display"), Some("block"));
    }

    #[test]
    fn test_inline_and_important() {
        let (mut tree, _, p) = build();
        tree.element_mut(p)
            .unwrap()
            .set_attribute("style", "color: green; width: 5px");

        let mut resolver = StyleResolver::new();
        resolver.add_stylesheet(parse_stylesheet("p { color: red; width: 9px !important }").unwrap());
        let style = resolver.compute_style(&tree, p);
        assert_eq!(style.get("color"), Some("green"));
        assert_eq!(style.get("width"), Some("9px"));
    }

    #[test]
    fn test_font_size_inheritance() {
        let (tree, html, p) = build();
        let mut resolver = StyleResolver::new();
        resolver.add_stylesheet(parse_stylesheet("html { font-size: 62.5% } p { font-size: 2rem }").unwrap());

        assert_eq!(resolver.compute_style(&tree, html).get("font-size"), Some("10px"));
        assert_eq!(resolver.compute_style(&tree, p).get("font-size"), Some("20px"));
    }

    #[test]
    fn test_defaults_without_sheets() {
        let (tree, html, p) = build();
        let resolver = StyleResolver::new();
        assert_eq!(resolver.compute_style(&tree, html).font_size_px(), 16.0);
        assert_eq!(resolver.compute_style(&tree, p).get_property_value("font-size"), "16px");
        assert_eq!(resolver.compute_style(&tree, p).get_property_value("width"), "");
    }
}
