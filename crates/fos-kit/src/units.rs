//! Size and unit parsing

use std::sync::OnceLock;

use regex::Regex;

use crate::Dom;

/// Leading signed decimal run, then the rest
const SIZE_PATTERN: &str = r"(?s)^([+-]?\d*\.?\d*)(.*)$";

/// A size as accepted by the unit helpers: a bare number or a CSS string
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Size<'a> {
    Number(f64),
    Text(&'a str),
}

impl From<f64> for Size<'_> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Size<'_> {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl<'a> From<&'a str> for Size<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for Size<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value)
    }
}

fn size_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(SIZE_PATTERN).ok()).as_ref()
}

/// Split `"12rem"` into `(12.0, "rem")`.
///
/// Numbers come back with an empty unit. Strings are trimmed; an
/// unparseable number reads as 0 and a missing unit as `px`.
pub fn split_size_and_unit<'a>(value: impl Into<Size<'a>>) -> (f64, String) {
    let text = match value.into() {
        Size::Number(number) => return (number, String::new()),
        Size::Text(text) => text.trim(),
    };

    let (number, unit) = size_pattern()
        .and_then(|re| re.captures(text))
        .map(|caps| {
            let number = caps.get(1).map_or("", |m| m.as_str());
            let unit = caps.get(2).map_or("", |m| m.as_str());
            (number, unit)
        })
        .unwrap_or(("", text));

    let number = number.parse::<f64>().unwrap_or(0.0);
    let unit = unit.trim().to_lowercase();
    let unit = if unit.is_empty() { "px".to_string() } else { unit };
    (number, unit)
}

/// Convert a rem size to pixels against the root element's font size.
///
/// Bare numbers are rem. `px` strings come back unchanged; any other unit
/// is treated as rem.
pub fn rem_to_pixels<'a>(dom: &Dom, value: impl Into<Size<'a>>) -> f64 {
    let (number, unit) = match value.into() {
        Size::Number(number) => (number, "rem".to_string()),
        text @ Size::Text(_) => split_size_and_unit(text),
    };
    if unit == "px" {
        return number;
    }
    number * root_font_size(dom)
}

/// Computed `font-size` of the document element in pixels
pub fn root_font_size(dom: &Dom) -> f64 {
    let fallback = dom.config().root_font_size_fallback;
    let Some(root) = dom.document_element() else {
        return fallback;
    };
    let px = dom.computed_style(root).font_size_px();
    if px.is_finite() && px > 0.0 { px } else { fallback }
}

/// Format a number the way script `String(number)` does for common values.
///
/// Whole values print without a fraction at any magnitude; `-0` prints as `0`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_size_and_unit() {
        assert_eq!(split_size_and_unit("12rem"), (12.0, "rem".to_string()));
        assert_eq!(split_size_and_unit("42PX"), (42.0, "px".to_string()));
        assert_eq!(split_size_and_unit("50"), (50.0, "px".to_string()));
        assert_eq!(split_size_and_unit("    50   % "), (50.0, "%".to_string()));
        assert_eq!(split_size_and_unit(1), (1.0, String::new()));
        assert_eq!(split_size_and_unit(".5em"), (0.5, "em".to_string()));
        assert_eq!(split_size_and_unit("-3px"), (-3.0, "px".to_string()));
    }

    #[test]
    fn test_split_unparseable_number_defaults_to_zero() {
        assert_eq!(split_size_and_unit("auto"), (0.0, "auto".to_string()));
        assert_eq!(split_size_and_unit(""), (0.0, "px".to_string()));
        assert_eq!(split_size_and_unit("."), (0.0, "px".to_string()));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(-1e19), "-10000000000000000000");
        assert_eq!(format_number(9.5e18), "9500000000000000000");
    }
}
