//! CSS Parser using lightningcss
//!
//! Parses CSS stylesheets into our internal representation. lightningcss
//! does the tokenizing and validation; selectors are re-read through our
//! own selector grammar so they can be matched against the DOM tree.

use lightningcss::declaration::DeclarationBlock;
use lightningcss::properties::Property;
use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::traits::ToCss;

use crate::selectors::SelectorList;
use crate::{CssError, Declaration, Rule, Stylesheet};

/// CSS Parser
pub struct CssParser;

impl CssParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a CSS stylesheet
    pub fn parse(&self, css: &str) -> Result<Stylesheet, CssError> {
        let stylesheet = StyleSheet::parse(css, ParserOptions::default()).map_err(|e| {
            CssError::ParseError {
                line: e.loc.as_ref().map_or(0, |loc| loc.line + 1),
                message: e.kind.to_string(),
            }
        })?;

        let mut result = Stylesheet::default();
        for rule in stylesheet.rules.0.iter() {
            if let Some(converted) = self.convert_rule(rule) {
                result.rules.push(converted);
            }
        }

        tracing::debug!(rules = result.len(), "Parsed stylesheet");
        Ok(result)
    }

    fn convert_rule(&self, rule: &CssRule) -> Option<Rule> {
        match rule {
            CssRule::Style(style_rule) => {
                let text = style_rule
                    .selectors
                    .to_css_string(PrinterOptions::default())
                    .ok()?;
                let selectors = match SelectorList::parse(&text) {
                    Ok(selectors) => selectors,
                    Err(err) => {
                        tracing::debug!(selector = %text, error = %err, "Skipping rule");
                        return None;
                    }
                };
                let declarations = self.convert_declarations(&style_rule.declarations);
                Some(Rule {
                    selectors,
                    declarations,
                })
            }
            // Skip other rule types (media queries, keyframes, etc.)
            _ => None,
        }
    }

    fn convert_declarations(&self, block: &DeclarationBlock) -> Vec<Declaration> {
        let normal = block.declarations.iter().map(|d| (d, false));
        let important = block.important_declarations.iter().map(|d| (d, true));
        normal
            .chain(important)
            .filter_map(|(decl, important)| self.convert_declaration(decl, important))
            .collect()
    }

    fn convert_declaration(&self, decl: &Property, important: bool) -> Option<Declaration> {
        let property = decl.property_id().name().to_string();
        let value = decl.value_to_css_string(PrinterOptions::default()).ok()?;
        Some(Declaration {
            property,
            value,
            important,
        })
    }
}

impl Default for CssParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let css = r#"
            .foo { display: block; }
            #bar { color: red; }
        "#;

        let result = CssParser::new().parse(css);
        assert!(result.is_ok(), "Parse error: {:?}", result.err());

        let stylesheet = result.unwrap();
        assert_eq!(stylesheet.len(), 2);
        assert_eq!(stylesheet.rules[0].declarations[0].property, "display");
        assert_eq!(stylesheet.rules[0].declarations[0].value, "block");
    }

    #[test]
    fn test_parse_important() {
        let css = "p { font-size: 12px !important; margin-top: 4px }";
        let stylesheet = CssParser::new().parse(css).unwrap();
        let decls = &stylesheet.rules[0].declarations;

        let font = decls.iter().find(|d| d.property == "font-size").unwrap();
        assert!(font.important);
        assert_eq!(font.value, "12px");
        assert!(decls.iter().any(|d| d.property == "margin-top" && !d.important));
    }

    #[test]
    fn test_skips_unsupported_selectors() {
        let css = "p::before { color: red } p { color: blue }";
        let stylesheet = CssParser::new().parse(css).unwrap();
        assert_eq!(stylesheet.len(), 1);
    }
}
