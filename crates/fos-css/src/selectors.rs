//! CSS Selectors Module
//!
//! Selector model and parser: selector lists of complex selectors built
//! from compound selectors and combinators.

use std::fmt;

use crate::Specificity;

/// Selector parse error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected '{found}' at offset {offset}")]
    Unexpected { found: char, offset: usize },
    #[error("unexpected end of selector")]
    UnexpectedEnd,
    #[error("unsupported pseudo selector ':{0}'")]
    UnsupportedPseudo(String),
    #[error("invalid nth expression '{0}'")]
    InvalidNth(String),
}

/// Comma-separated list of complex selectors
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList(pub Vec<ComplexSelector>);

impl SelectorList {
    /// Parse a selector list such as `ul > li.item, .Header_title`
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut parser = SelectorParser::new(input);
        let list = parser.parse_list(false)?;
        match parser.peek() {
            None => Ok(list),
            Some(found) => Err(SelectorError::Unexpected {
                found,
                offset: parser.pos,
            }),
        }
    }

    /// Highest specificity in the list
    pub fn max_specificity(&self) -> Specificity {
        self.0
            .iter()
            .map(ComplexSelector::specificity)
            .max()
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComplexSelector> {
        self.0.iter()
    }
}

/// Compound selectors joined by combinators, stored left to right.
/// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub compounds: Vec<CompoundSelector>,
    pub combinators: Vec<Combinator>,
}

impl ComplexSelector {
    pub fn specificity(&self) -> Specificity {
        self.compounds
            .iter()
            .flat_map(|c| c.components.iter())
            .fold(Specificity::default(), |acc, c| acc + c.specificity())
    }
}

/// Selector combinators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    NextSibling,
    /// `a ~ b`
    SubsequentSibling,
}

/// Simple selectors that must all match one element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundSelector {
    pub components: Vec<SelectorComponent>,
}

/// A component of a compound selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Universal selector *
    Universal,
    /// Type selector (tag name, lowercase)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
    /// Pseudo-class :first-child, :not(), etc.
    PseudoClass(PseudoClass),
}

impl SelectorComponent {
    fn specificity(&self) -> Specificity {
        match self {
            Self::Universal => Specificity::default(),
            Self::Type(_) => Specificity(0, 0, 1),
            Self::Id(_) => Specificity(1, 0, 0),
            Self::Class(_) | Self::Attribute(_) => Specificity(0, 1, 0),
            Self::PseudoClass(pseudo) => match pseudo {
                PseudoClass::Where(_) => Specificity::default(),
                PseudoClass::Not(list) | PseudoClass::Is(list) => list.max_specificity(),
                _ => Specificity(0, 1, 0),
            },
        }
    }
}

/// Supported pseudo-classes
#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    // Tree-structural pseudo-classes
    Root,
    Empty,
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    NthChild(NthExpression),
    NthLastChild(NthExpression),
    NthOfType(NthExpression),
    NthLastOfType(NthExpression),

    // Attribute-backed input states
    Checked,
    Disabled,
    Enabled,

    // Interaction states; the host has no pointer or focus, so these never match
    Hover,
    Active,
    Focus,

    // Logical pseudo-classes
    Not(SelectorList),
    Is(SelectorList),
    Where(SelectorList),
}

/// An+B expression for :nth-* selectors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NthExpression {
    /// Coefficient (A in An+B)
    pub a: i32,
    /// Offset (B in An+B)
    pub b: i32,
}

impl NthExpression {
    /// Create "odd" expression (2n+1)
    pub fn odd() -> Self {
        Self { a: 2, b: 1 }
    }

    /// Create "even" expression (2n)
    pub fn even() -> Self {
        Self { a: 2, b: 0 }
    }

    /// Create a simple index (0n+b)
    pub fn index(n: i32) -> Self {
        Self { a: 0, b: n }
    }

    /// Create An+B expression
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Parse from string like "2n+1", "odd", "even", "3"
    pub fn parse(s: &str) -> Option<Self> {
        let s: String = s.split_whitespace().collect::<String>().to_ascii_lowercase();

        match s.as_str() {
            "odd" => return Some(Self::odd()),
            "even" => return Some(Self::even()),
            _ => {}
        }

        if let Ok(n) = s.parse::<i32>() {
            return Some(Self::index(n));
        }

        let n_pos = s.find('n')?;
        let a = match &s[..n_pos] {
            "" | "+" => 1,
            "-" => -1,
            a_str => a_str.parse().ok()?,
        };
        let rest = &s[n_pos + 1..];
        let b = if rest.is_empty() { 0 } else { rest.parse().ok()? };
        Some(Self::new(a, b))
    }

    /// Check if index n (1-based) matches this expression
    pub fn matches(&self, n: i32) -> bool {
        // Widened so extreme parsed values cannot overflow
        let (a, b, n) = (i64::from(self.a), i64::from(self.b), i64::from(n));
        if a == 0 {
            return n == b;
        }
        let diff = n - b;
        diff % a == 0 && diff / a >= 0
    }
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };
        let Some(matcher) = &self.matcher else {
            return true;
        };

        let fold = |s: &str| {
            if self.case_insensitive {
                s.to_lowercase()
            } else {
                s.to_string()
            }
        };
        let actual = fold(value);

        match matcher {
            AttributeMatcher::Exact(expected) => actual == fold(expected),
            AttributeMatcher::Contains(expected) => {
                let expected = fold(expected);
                actual.split_whitespace().any(|w| w == expected)
            }
            AttributeMatcher::DashMatch(expected) => {
                let expected = fold(expected);
                actual == expected || actual.starts_with(&format!("{expected}-"))
            }
            // Empty operands never match for the substring family
            AttributeMatcher::Prefix(expected) => {
                !expected.is_empty() && actual.starts_with(&fold(expected))
            }
            AttributeMatcher::Suffix(expected) => {
                !expected.is_empty() && actual.ends_with(&fold(expected))
            }
            AttributeMatcher::Substring(expected) => {
                !expected.is_empty() && actual.contains(&fold(expected))
            }
        }
    }
}

// ============================================================================
// PARSER
// ============================================================================

struct SelectorParser {
    chars: Vec<char>,
    pos: usize,
}

impl SelectorParser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.trim().chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn expect(&mut self, wanted: char) -> Result<(), SelectorError> {
        match self.bump() {
            Some(c) if c == wanted => Ok(()),
            Some(found) => Err(SelectorError::Unexpected {
                found,
                offset: self.pos - 1,
            }),
            None => Err(SelectorError::UnexpectedEnd),
        }
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::Unexpected {
                found,
                offset: self.pos,
            },
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn parse_list(&mut self, nested: bool) -> Result<SelectorList, SelectorError> {
        if self.chars.is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            selectors.push(self.parse_complex()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                }
                Some(')') if nested => break,
                None if !nested => break,
                _ => return Err(self.unexpected()),
            }
        }
        Ok(SelectorList(selectors))
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(',') | Some(')') | None => break,
                Some(_) if had_whitespace => {
                    combinators.push(Combinator::Descendant);
                    compounds.push(self.parse_compound()?);
                    continue;
                }
                Some(_) => return Err(self.unexpected()),
            };
            self.pos += 1;
            self.skip_whitespace();
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        Ok(ComplexSelector {
            compounds,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut components = Vec::new();

        if self.peek() == Some('*') {
            self.pos += 1;
            components.push(SelectorComponent::Universal);
        } else if self.peek().is_some_and(is_ident_char) {
            components.push(SelectorComponent::Type(self.ident()?.to_ascii_lowercase()));
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    components.push(SelectorComponent::Id(self.ident()?));
                }
                Some('.') => {
                    self.pos += 1;
                    components.push(SelectorComponent::Class(self.ident()?));
                }
                Some('[') => {
                    self.pos += 1;
                    components.push(SelectorComponent::Attribute(self.attribute()?));
                }
                Some(':') => {
                    self.pos += 1;
                    components.push(SelectorComponent::PseudoClass(self.pseudo_class()?));
                }
                _ => break,
            }
        }

        if components.is_empty() {
            return Err(self.unexpected());
        }
        Ok(CompoundSelector { components })
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.pos += 1;
                out.push(self.bump().ok_or(SelectorError::UnexpectedEnd)?);
            } else if is_ident_char(c) {
                self.pos += 1;
                out.push(c);
            } else {
                break;
            }
        }
        if out.is_empty() {
            return Err(self.unexpected());
        }
        Ok(out)
    }

    fn attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        let op = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(AttributeSelector {
                    name,
                    matcher: None,
                    case_insensitive: false,
                });
            }
            Some('=') => {
                self.pos += 1;
                '='
            }
            Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
                self.pos += 1;
                self.expect('=')?;
                c
            }
            _ => return Err(self.unexpected()),
        };

        self.skip_whitespace();
        let value = self.attribute_value()?;
        self.skip_whitespace();

        let mut case_insensitive = false;
        if let Some(flag @ ('i' | 'I' | 's' | 'S')) = self.peek() {
            self.pos += 1;
            case_insensitive = flag.eq_ignore_ascii_case(&'i');
            self.skip_whitespace();
        }
        self.expect(']')?;

        let matcher = match op {
            '=' => AttributeMatcher::Exact(value),
            '~' => AttributeMatcher::Contains(value),
            '|' => AttributeMatcher::DashMatch(value),
            '^' => AttributeMatcher::Prefix(value),
            '$' => AttributeMatcher::Suffix(value),
            _ => AttributeMatcher::Substring(value),
        };
        Ok(AttributeSelector {
            name,
            matcher: Some(matcher),
            case_insensitive,
        })
    }

    fn attribute_value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let mut out = String::new();
                loop {
                    match self.bump() {
                        Some('\\') => out.push(self.bump().ok_or(SelectorError::UnexpectedEnd)?),
                        Some(c) if c == quote => break,
                        Some(c) => out.push(c),
                        None => return Err(SelectorError::UnexpectedEnd),
                    }
                }
                Ok(out)
            }
            _ => self.ident(),
        }
    }

    fn pseudo_class(&mut self) -> Result<PseudoClass, SelectorError> {
        if self.peek() == Some(':') {
            // Pseudo-elements never match elements of the tree
            self.pos += 1;
            let name = self.ident()?;
            return Err(SelectorError::UnsupportedPseudo(format!(":{name}")));
        }

        let name = self.ident()?.to_ascii_lowercase();
        if self.peek() == Some('(') {
            self.pos += 1;
            let pseudo = match name.as_str() {
                "not" | "is" | "where" | "matches" => {
                    let list = self.parse_list(true)?;
                    match name.as_str() {
                        "not" => PseudoClass::Not(list),
                        "where" => PseudoClass::Where(list),
                        _ => PseudoClass::Is(list),
                    }
                }
                "nth-child" | "nth-last-child" | "nth-of-type" | "nth-last-of-type" => {
                    let raw = self.raw_argument();
                    let expr = NthExpression::parse(&raw).ok_or(SelectorError::InvalidNth(raw))?;
                    match name.as_str() {
                        "nth-child" => PseudoClass::NthChild(expr),
                        "nth-last-child" => PseudoClass::NthLastChild(expr),
                        "nth-of-type" => PseudoClass::NthOfType(expr),
                        _ => PseudoClass::NthLastOfType(expr),
                    }
                }
                _ => return Err(SelectorError::UnsupportedPseudo(name)),
            };
            self.skip_whitespace();
            self.expect(')')?;
            return Ok(pseudo);
        }

        Ok(match name.as_str() {
            "root" => PseudoClass::Root,
            "empty" => PseudoClass::Empty,
            "first-child" => PseudoClass::FirstChild,
            "last-child" => PseudoClass::LastChild,
            "only-child" => PseudoClass::OnlyChild,
            "first-of-type" => PseudoClass::FirstOfType,
            "last-of-type" => PseudoClass::LastOfType,
            "only-of-type" => PseudoClass::OnlyOfType,
            "checked" => PseudoClass::Checked,
            "disabled" => PseudoClass::Disabled,
            "enabled" => PseudoClass::Enabled,
            "hover" => PseudoClass::Hover,
            "active" => PseudoClass::Active,
            "focus" => PseudoClass::Focus,
            _ => return Err(SelectorError::UnsupportedPseudo(name)),
        })
    }

    // Text up to the closing parenthesis, which is left in place
    fn raw_argument(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == ')' {
                break;
            }
            out.push(c);
            self.pos += 1;
        }
        out
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Descendant => " ",
            Self::Child => " > ",
            Self::NextSibling => " + ",
            Self::SubsequentSibling => " ~ ",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nth_expression_odd() {
        let expr = NthExpression::odd();
        assert!(expr.matches(1));
        assert!(!expr.matches(2));
        assert!(expr.matches(3));
        assert!(!expr.matches(4));
    }

    #[test]
    fn test_nth_expression_negative_a() {
        let expr = NthExpression::parse("-n+3").unwrap();
        assert_eq!(expr, NthExpression::new(-1, 3));
        assert!(expr.matches(1));
        assert!(expr.matches(3));
        assert!(!expr.matches(4));
    }

    #[test]
    fn test_nth_expression_extreme_offsets() {
        let expr = NthExpression::parse("n-2147483648").unwrap();
        assert_eq!(expr, NthExpression::new(1, i32::MIN));
        assert!(expr.matches(1));
        assert!(expr.matches(i32::MAX));

        let expr = NthExpression::new(-1, i32::MIN);
        assert!(!expr.matches(1));
        assert!(NthExpression::new(i32::MIN, i32::MAX).matches(i32::MAX));
    }

    #[test]
    fn test_nth_expression_parse() {
        assert_eq!(NthExpression::parse("odd"), Some(NthExpression::odd()));
        assert_eq!(NthExpression::parse("even"), Some(NthExpression::even()));
        assert_eq!(NthExpression::parse("3"), Some(NthExpression::index(3)));
        assert_eq!(NthExpression::parse("2n + 1"), Some(NthExpression::new(2, 1)));
        assert_eq!(NthExpression::parse("x"), None);
    }

    #[test]
    fn test_parse_compound_and_combinators() {
        let list = SelectorList::parse("ul > li.item:first-child a, .Header_title").unwrap();
        assert_eq!(list.0.len(), 2);

        let first = &list.0[0];
        assert_eq!(first.compounds.len(), 3);
        assert_eq!(first.combinators, vec![Combinator::Child, Combinator::Descendant]);
        assert_eq!(first.compounds[1].components.len(), 3);

        let second = &list.0[1];
        assert_eq!(
            second.compounds[0].components,
            vec![SelectorComponent::Class("Header_title".to_string())]
        );
    }

    #[test]
    fn test_parse_attribute() {
        let list = SelectorList::parse(r#"input[type="text" i]"#).unwrap();
        let SelectorComponent::Attribute(attr) = &list.0[0].compounds[0].components[1] else {
            panic!("expected attribute selector");
        };
        assert_eq!(attr.name, "type");
        assert!(attr.case_insensitive);
        assert!(attr.matches(Some("TEXT")));
    }

    #[test]
    fn test_specificity() {
        let list = SelectorList::parse("#a .b div").unwrap();
        assert_eq!(list.0[0].specificity(), Specificity(1, 1, 1));

        let list = SelectorList::parse(":where(#a) p:not(.x, #y)").unwrap();
        assert_eq!(list.0[0].specificity(), Specificity(1, 0, 1));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(SelectorList::parse(""), Err(SelectorError::Empty));
        assert_eq!(SelectorList::parse("   "), Err(SelectorError::Empty));
        assert!(matches!(SelectorList::parse("div,"), Err(SelectorError::UnexpectedEnd)));
        assert!(matches!(
            SelectorList::parse("a::before"),
            Err(SelectorError::UnsupportedPseudo(_))
        ));
        assert!(matches!(SelectorList::parse("[x"), Err(SelectorError::UnexpectedEnd)));
        assert!(SelectorList::parse("div >").is_err());
    }

    #[test]
    fn test_attribute_selector_prefix() {
        let sel = AttributeSelector {
            name: "class".to_string(),
            matcher: Some(AttributeMatcher::Prefix("btn-".to_string())),
            case_insensitive: false,
        };

        assert!(sel.matches(Some("btn-primary")));
        assert!(!sel.matches(Some("button")));
        assert!(!sel.matches(None));
    }
}
