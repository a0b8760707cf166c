//! Inline style declaration (`element.style`)

/// Normalize a CSS property name to kebab-case.
///
/// Accepts both `background-color` and the scripting form `backgroundColor`.
/// A leading capital is a vendor prefix (`WebkitTransform` becomes
/// `-webkit-transform`) and `cssFloat` maps to `float`. Custom properties
/// (`--x`) are kept verbatim.
pub fn normalize_property_name(name: &str) -> String {
    let name = name.trim();
    if name.starts_with("--") {
        return name.to_string();
    }
    if name == "cssFloat" {
        return "float".to_string();
    }
    if name.contains('-') {
        return name.to_ascii_lowercase();
    }

    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Ordered set of inline style properties
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclaration {
    properties: Vec<(String, String)>,
}

impl StyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `style` attribute value
    pub fn parse(css_text: &str) -> Self {
        let mut style = Self::new();
        style.set_css_text(css_text);
        style
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Set a property; an empty value removes it
    pub fn set_property(&mut self, name: &str, value: &str) {
        let name = normalize_property_name(name);
        let value = value.trim();
        if value.is_empty() {
            self.properties.retain(|(n, _)| *n != name);
            return;
        }
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.properties.push((name, value.to_string())),
        }
    }

    pub fn get_property_value(&self, name: &str) -> Option<&str> {
        let name = normalize_property_name(name);
        self.properties
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove_property(&mut self, name: &str) -> Option<String> {
        let name = normalize_property_name(name);
        let pos = self.properties.iter().position(|(n, _)| *n == name)?;
        Some(self.properties.remove(pos).1)
    }

    pub fn clear(&mut self) {
        self.properties.clear();
    }

    /// Serialize as `name: value;` pairs
    pub fn css_text(&self) -> String {
        self.properties
            .iter()
            .map(|(n, v)| format!("{n}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Replace all properties from a declaration list
    pub fn set_css_text(&mut self, css_text: &str) {
        self.clear();
        for declaration in css_text.split(';') {
            if let Some((name, value)) = declaration.split_once(':') {
                if !name.trim().is_empty() {
                    self.set_property(name, value);
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}
