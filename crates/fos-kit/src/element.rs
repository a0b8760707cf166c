//! Element construction, attributes and styles

use std::fmt;
use std::rc::Rc;

use fos_dom::NodeId;

use crate::units::{format_number, split_size_and_unit};
use crate::Dom;

/// Attribute value for [`set_attributes`]
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// `true` sets the empty attribute, `false` removes it
    Flag(bool),
    /// Removes the attribute
    Null,
    Text(String),
    Number(f64),
}

impl From<bool> for AttrValue {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

impl From<&str> for AttrValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<f64> for AttrValue {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

impl From<i32> for AttrValue {
    fn from(number: i32) -> Self {
        Self::Number(f64::from(number))
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Callback computing a style value from the element it is applied to
pub type StyleFn = Rc<dyn Fn(&Dom, NodeId, &StyleObject) -> StyleValue>;

/// Style property value
#[derive(Clone)]
pub enum StyleValue {
    /// Clears the property
    Null,
    Text(String),
    Number(f64),
    Computed(StyleFn),
}

impl StyleValue {
    pub fn computed(f: impl Fn(&Dom, NodeId, &StyleObject) -> StyleValue + 'static) -> Self {
        Self::Computed(Rc::new(f))
    }
}

impl From<&str> for StyleValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<f64> for StyleValue {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

impl From<i32> for StyleValue {
    fn from(number: i32) -> Self {
        Self::Number(f64::from(number))
    }
}

impl fmt::Debug for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Number(number) => f.debug_tuple("Number").field(number).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Ordered map of style property to value; names may be camelCase
#[derive(Debug, Clone, Default)]
pub struct StyleObject {
    properties: Vec<(String, StyleValue)>,
}

impl StyleObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`StyleObject::set`]
    pub fn with(mut self, property: &str, value: impl Into<StyleValue>) -> Self {
        self.set(property, value);
        self
    }

    pub fn set(&mut self, property: &str, value: impl Into<StyleValue>) {
        let value = value.into();
        match self.properties.iter_mut().find(|(name, _)| name == property) {
            Some((_, slot)) => *slot = value,
            None => self.properties.push((property.to_string(), value)),
        }
    }

    pub fn get(&self, property: &str) -> Option<&StyleValue> {
        self.properties
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.properties.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// One element or several, for [`set_style`]
pub trait StyleTargets {
    fn style_targets(&self) -> Vec<NodeId>;
}

impl StyleTargets for NodeId {
    fn style_targets(&self) -> Vec<NodeId> {
        vec![*self]
    }
}

impl StyleTargets for [NodeId] {
    fn style_targets(&self) -> Vec<NodeId> {
        self.to_vec()
    }
}

impl StyleTargets for Vec<NodeId> {
    fn style_targets(&self) -> Vec<NodeId> {
        self.clone()
    }
}

impl<const N: usize> StyleTargets for [NodeId; N] {
    fn style_targets(&self) -> Vec<NodeId> {
        self.to_vec()
    }
}

/// Apply attributes: `true`/`""` set the empty value, `false`/null remove
pub fn set_attributes(dom: &Dom, element: NodeId, attributes: &[(&str, AttrValue)]) {
    for (name, value) in attributes {
        match value {
            AttrValue::Flag(false) | AttrValue::Null => dom.remove_attribute(element, name),
            AttrValue::Flag(true) => dom.set_attribute(element, name, ""),
            AttrValue::Text(text) => dom.set_attribute(element, name, text),
            AttrValue::Number(number) => dom.set_attribute(element, name, &format_number(*number)),
        }
    }
}

/// Apply a style object to one or several elements.
///
/// Computed values are evaluated per element before assignment.
pub fn set_style<T: StyleTargets + ?Sized>(dom: &Dom, elements: &T, style: &StyleObject) {
    for element in elements.style_targets() {
        for (property, value) in style.iter() {
            let resolved = match value {
                StyleValue::Computed(f) => f(dom, element, style),
                other => other.clone(),
            };
            let text = match resolved {
                StyleValue::Text(text) => text,
                StyleValue::Number(number) => format_number(number),
                StyleValue::Null => String::new(),
                StyleValue::Computed(_) => {
                    tracing::debug!(property, "Nested computed style value cleared");
                    String::new()
                }
            };

            let mut document = dom.document_mut();
            if let Some(elem) = document.tree_mut().element_mut(element) {
                // An empty value removes the property
                elem.set_style_property(property, &text);
            }
        }
    }
}

/// Create an element from a tag name, or from markup when the input
/// contains `<` (first element of the parsed fragment).
///
/// Returns `None` when the markup yields no element.
pub fn element(
    dom: &Dom,
    html_or_tag: &str,
    attributes: Option<&[(&str, AttrValue)]>,
    style: Option<&StyleObject>,
) -> Option<NodeId> {
    let node = if html_or_tag.contains('<') {
        let nodes = dom.parse_fragment(html_or_tag);
        nodes.into_iter().find(|&node| dom.is_element(node))?
    } else {
        dom.create_element(html_or_tag.trim())
    };

    if let Some(attributes) = attributes {
        set_attributes(dom, node, attributes);
    }
    if let Some(style) = style {
        set_style(dom, &node, style);
    }
    Some(node)
}

/// Computed style property; `""` when unknown
pub fn get_style(dom: &Dom, element: NodeId, property: &str) -> String {
    dom.computed_style(element)
        .get_property_value(property)
        .to_string()
}

/// Which half of a numeric style value to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StylePart {
    Value,
    Unit,
}

/// One half of a style value split by [`split_size_and_unit`]
#[derive(Debug, Clone, PartialEq)]
pub enum StyleReading {
    Value(f64),
    Unit(String),
}

/// Computed style property decomposed into its number or its unit
pub fn get_style_part(dom: &Dom, element: NodeId, property: &str, part: StylePart) -> StyleReading {
    let (value, unit) = split_size_and_unit(get_style(dom, element, property).as_str());
    match part {
        StylePart::Value => StyleReading::Value(value),
        StylePart::Unit => StyleReading::Unit(unit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_from_tag() {
        let dom = Dom::default();
        let button = element(&dom, "button", None, None).unwrap();
        assert_eq!(dom.tag_name(button).as_deref(), Some("button"));
        assert_eq!(dom.parent_element(button), None);
    }

    #[test]
    fn test_element_from_markup() {
        let dom = Dom::default();
        let node = element(&dom, "text <em class='x'>hi</em><b></b>", None, None).unwrap();
        assert_eq!(dom.tag_name(node).as_deref(), Some("em"));
        assert!(dom.has_class(node, "x"));
        assert_eq!(element(&dom, "<!-- only a comment -->", None, None), None);
    }

    #[test]
    fn test_attribute_rules() {
        let dom = Dom::default();
        let input = dom.create_element("input");
        dom.set_attribute(input, "readonly", "");
        set_attributes(
            &dom,
            input,
            &[
                ("disabled", true.into()),
                ("readonly", false.into()),
                ("value", "".into()),
                ("maxlength", 12.into()),
                ("title", AttrValue::from(None::<&str>)),
            ],
        );
        assert_eq!(dom.get_attribute(input, "disabled").as_deref(), Some(""));
        assert_eq!(dom.get_attribute(input, "readonly"), None);
        assert_eq!(dom.get_attribute(input, "value").as_deref(), Some(""));
        assert_eq!(dom.get_attribute(input, "maxlength").as_deref(), Some("12"));
        assert_eq!(dom.get_attribute(input, "title"), None);
    }

    #[test]
    fn test_set_style_values() {
        let dom = Dom::default();
        let a = dom.create_element("div");
        let b = dom.create_element("div");
        dom.set_attribute(b, "data-width", "30");

        let style = StyleObject::new()
            .with("backgroundColor", "red")
            .with("opacity", 0.5)
            .with(
                "width",
                StyleValue::computed(|dom, el, _| match dom.get_attribute(el, "data-width") {
                    Some(w) => format!("{w}px").into(),
                    None => StyleValue::Null,
                }),
            );
        set_style(&dom, &[a, b], &style);

        assert_eq!(dom.inline_style(a, "background-color"), "red");
        assert_eq!(dom.inline_style(a, "opacity"), "0.5");
        assert_eq!(dom.inline_style(a, "width"), "");
        assert_eq!(dom.inline_style(b, "width"), "30px");
    }
}
