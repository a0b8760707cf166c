//! CSS Property Definitions
//!
//! Initial values, inheritance and length resolution for the properties the
//! style resolver computes.

/// Root font size used when nothing else is specified
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// Initial values applied before the cascade
pub const INITIAL_VALUES: &[(&str, &str)] = &[
    ("color", "canvastext"),
    ("font-size", "16px"),
    ("font-style", "normal"),
    ("font-weight", "400"),
    ("line-height", "normal"),
    ("opacity", "1"),
    ("position", "static"),
    ("visibility", "visible"),
];

/// Properties whose computed value passes from parent to child
pub const INHERITED: &[&str] = &[
    "color",
    "cursor",
    "direction",
    "font-family",
    "font-size",
    "font-style",
    "font-variant",
    "font-weight",
    "letter-spacing",
    "line-height",
    "text-align",
    "text-indent",
    "text-transform",
    "visibility",
    "white-space",
    "word-spacing",
];

pub fn is_inherited(property: &str) -> bool {
    property.starts_with("--") || INHERITED.contains(&property)
}

pub fn initial_value(property: &str) -> Option<&'static str> {
    INITIAL_VALUES
        .iter()
        .find(|(name, _)| *name == property)
        .map(|(_, value)| *value)
}

/// User-agent `display` for a tag
pub fn default_display(tag: &str) -> &'static str {
    match tag {
        "head" | "script" | "style" | "title" | "meta" | "link" | "template" | "base" => "none",
        "li" => "list-item",
        "table" => "table",
        "tr" => "table-row",
        "td" | "th" => "table-cell",
        "html" | "body" | "div" | "p" | "section" | "article" | "header" | "footer" | "nav"
        | "main" | "aside" | "ul" | "ol" | "form" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
        | "figure" | "blockquote" | "pre" | "hr" | "address" | "fieldset" | "details"
        | "dl" | "dd" | "dt" => "block",
        _ => "inline",
    }
}

/// Split a CSS dimension such as `1.5rem` into number and lowercase unit
pub fn split_dimension(value: &str) -> Option<(f64, String)> {
    let value = value.trim();
    let end = value
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || ((c == '-' || c == '+') && i == 0)))
        .map_or(value.len(), |(i, _)| i);
    let number = value[..end].parse::<f64>().ok()?;
    Some((number, value[end..].trim().to_ascii_lowercase()))
}

/// Resolve a specified `font-size` to pixels.
///
/// `parent_px` backs `em`, `%` and the relative keywords, `root_px` backs
/// `rem`. Unresolvable values behave like `inherit`.
pub fn resolve_font_size(value: &str, parent_px: f64, root_px: f64) -> f64 {
    let keyword = match value.trim().to_ascii_lowercase().as_str() {
        "xx-small" => Some(9.0),
        "x-small" => Some(10.0),
        "small" => Some(13.0),
        "medium" => Some(DEFAULT_FONT_SIZE_PX),
        "large" => Some(18.0),
        "x-large" => Some(24.0),
        "xx-large" => Some(32.0),
        "xxx-large" => Some(48.0),
        "smaller" => Some(parent_px / 1.2),
        "larger" => Some(parent_px * 1.2),
        _ => None,
    };
    if let Some(px) = keyword {
        return px;
    }

    let Some((number, unit)) = split_dimension(value) else {
        return parent_px;
    };
    match unit.as_str() {
        "px" => number,
        "" if number == 0.0 => 0.0,
        "em" => number * parent_px,
        "rem" => number * root_px,
        "%" => number / 100.0 * parent_px,
        "pt" => number * 4.0 / 3.0,
        "pc" => number * 16.0,
        "in" => number * 96.0,
        "cm" => number * 96.0 / 2.54,
        "mm" => number * 96.0 / 25.4,
        "q" => number * 96.0 / 101.6,
        _ => parent_px,
    }
}

/// Format a pixel length the way computed styles report it
pub fn format_px(px: f64) -> String {
    format!("{px}px")
}
