//! SVG attribute helpers

use crate::units::format_number;

/// An SVG color: a CSS color string or a packed `0xRRGGBB` number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvgColor<'a> {
    Text(&'a str),
    Rgb(u32),
}

impl<'a> From<&'a str> for SvgColor<'a> {
    fn from(color: &'a str) -> Self {
        Self::Text(color)
    }
}

impl From<u32> for SvgColor<'_> {
    fn from(color: u32) -> Self {
        Self::Rgb(color)
    }
}

/// `"red"` stays `"red"`; `0xff00` becomes `"#00ff00"`
pub fn svg_color<'a>(color: impl Into<SvgColor<'a>>) -> String {
    match color.into() {
        SvgColor::Text(text) => text.to_string(),
        SvgColor::Rgb(rgb) => format!("#{rgb:06x}"),
    }
}

/// `translate(x y) ` with the trailing space, ready to concatenate
pub fn svg_position(x: f64, y: f64) -> String {
    format!("translate({} {}) ", format_number(x), format_number(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_color() {
        assert_eq!(svg_color("red"), "red");
        assert_eq!(svg_color(0xff0000u32), "#ff0000");
        assert_eq!(svg_color(0xffu32), "#0000ff");
        assert_eq!(svg_color(0x1234567u32), "#1234567");
    }

    #[test]
    fn test_svg_position() {
        assert_eq!(svg_position(10.0, -2.5), "translate(10 -2.5) ");
        assert_eq!(svg_position(1e19, 0.0), "translate(10000000000000000000 0) ");
    }
}
