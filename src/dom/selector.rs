// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! CSS selector parsing and matching
//!
//! Supports selector lists (`a, b`), compound selectors (`input.x[name=y]`),
//! the four combinators (descendant, `>`, `+`, `~`) and the structural and
//! form pseudo-classes found on portal pages.

use super::element::Element;
use crate::error::ScrapeError;

/// A comma separated list of selectors; matches when any of them does
#[derive(Debug, Clone)]
pub struct SelectorList {
    selectors: Vec<Selector>,
}

/// A complex selector: compound selectors joined by combinators
#[derive(Debug, Clone)]
pub struct Selector {
    /// Rightmost compound first
    compounds: Vec<Compound>,
    /// `combinators[i]` relates `compounds[i]` to `compounds[i + 1]`
    combinators: Vec<Combinator>,
}

/// Combinator between compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Descendant (space)
    Descendant,
    /// Child (>)
    Child,
    /// Adjacent sibling (+)
    AdjacentSibling,
    /// General sibling (~)
    GeneralSibling,
}

/// Simple selectors that must all match the same element
#[derive(Debug, Clone)]
pub struct Compound {
    parts: Vec<SelectorPart>,
}

/// A simple selector
#[derive(Debug, Clone)]
pub enum SelectorPart {
    /// Universal selector (*)
    Universal,
    /// Tag name
    Tag(String),
    /// ID selector (#id)
    Id(String),
    /// Class selector (.class)
    Class(String),
    /// Attribute selector ([attr], [attr=value], etc.)
    Attribute(AttributeSelector),
    /// Pseudo-class (:first-child, etc.)
    PseudoClass(PseudoClass),
}

/// Attribute selector
#[derive(Debug, Clone)]
pub struct AttributeSelector {
    pub name: String,
    pub operator: Option<AttributeOperator>,
    pub value: Option<String>,
    pub case_insensitive: bool,
}

/// Attribute selector operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    /// [attr=value] - exact match
    Equals,
    /// [attr~=value] - word in space-separated list
    Includes,
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch,
    /// [attr^=value] - starts with
    Prefix,
    /// [attr$=value] - ends with
    Suffix,
    /// [attr*=value] - contains substring
    Substring,
}

/// Supported pseudo-classes
#[derive(Debug, Clone)]
pub enum PseudoClass {
    FirstChild,
    LastChild,
    OnlyChild,
    NthChild(NthExpr),
    Empty,
    Checked,
    Disabled,
    Enabled,
    Not(SelectorList),
}

/// An+B expression for :nth-child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NthExpr {
    pub a: i32,
    pub b: i32,
}

impl SelectorList {
    /// Parse a CSS selector list
    pub fn parse(selector: &str) -> Result<Self, ScrapeError> {
        let trimmed = selector.trim();
        if trimmed.is_empty() {
            return Err(ScrapeError::selector(selector, "empty selector"));
        }
        let mut parser = SelectorParser::new(trimmed);
        let list = parser.parse_list()?;
        match parser.peek() {
            None => Ok(list),
            Some(c) => Err(parser.error(format!("unexpected '{}'", c))),
        }
    }

    /// Check if an element matches any selector of the list
    pub fn matches(&self, element: &Element<'_>) -> bool {
        self.selectors.iter().any(|s| s.matches(element))
    }

    /// Number of selectors in the list
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// Check if the list is empty (never true for a parsed list)
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}

impl Selector {
    /// Check if an element matches this selector
    pub fn matches(&self, element: &Element<'_>) -> bool {
        self.matches_from(0, element)
    }

    fn matches_from(&self, idx: usize, element: &Element<'_>) -> bool {
        if !self.compounds[idx].matches(element) {
            return false;
        }
        if idx + 1 == self.compounds.len() {
            return true;
        }

        match self.combinators[idx] {
            Combinator::Child => element
                .parent()
                .map_or(false, |p| self.matches_from(idx + 1, &p)),
            Combinator::Descendant => {
                let mut current = element.parent();
                while let Some(ancestor) = current {
                    if self.matches_from(idx + 1, &ancestor) {
                        return true;
                    }
                    current = ancestor.parent();
                }
                false
            }
            Combinator::AdjacentSibling => element
                .prev_element_sibling()
                .map_or(false, |s| self.matches_from(idx + 1, &s)),
            Combinator::GeneralSibling => {
                let mut current = element.prev_element_sibling();
                while let Some(sibling) = current {
                    if self.matches_from(idx + 1, &sibling) {
                        return true;
                    }
                    current = sibling.prev_element_sibling();
                }
                false
            }
        }
    }
}

impl Compound {
    fn matches(&self, element: &Element<'_>) -> bool {
        self.parts.iter().all(|part| part_matches(part, element))
    }
}

fn part_matches(part: &SelectorPart, element: &Element<'_>) -> bool {
    match part {
        SelectorPart::Universal => true,
        SelectorPart::Tag(tag) => element.tag_name().eq_ignore_ascii_case(tag),
        SelectorPart::Id(id) => element.attr("id") == Some(id.as_str()),
        SelectorPart::Class(class) => element.has_class(class),
        SelectorPart::Attribute(attr) => attribute_matches(attr, element),
        SelectorPart::PseudoClass(pseudo) => pseudo_matches(pseudo, element),
    }
}

fn attribute_matches(attr: &AttributeSelector, element: &Element<'_>) -> bool {
    let Some(value) = element.attr(&attr.name) else {
        return false;
    };

    let (Some(op), Some(target)) = (&attr.operator, &attr.value) else {
        return true;
    };

    let (value, target) = if attr.case_insensitive {
        (value.to_lowercase(), target.to_lowercase())
    } else {
        (value.to_string(), target.clone())
    };

    match op {
        AttributeOperator::Equals => value == target,
        AttributeOperator::Includes => value.split_whitespace().any(|w| w == target),
        AttributeOperator::DashMatch => {
            value == target || value.starts_with(&format!("{}-", target))
        }
        AttributeOperator::Prefix => !target.is_empty() && value.starts_with(&target),
        AttributeOperator::Suffix => !target.is_empty() && value.ends_with(&target),
        AttributeOperator::Substring => !target.is_empty() && value.contains(&target),
    }
}

fn pseudo_matches(pseudo: &PseudoClass, element: &Element<'_>) -> bool {
    match pseudo {
        PseudoClass::FirstChild => element.element_index() == 1,
        PseudoClass::LastChild => element.element_index() == element.sibling_count(),
        PseudoClass::OnlyChild => element.sibling_count() == 1,
        PseudoClass::NthChild(expr) => expr.matches(element.element_index() as i32),
        PseudoClass::Empty => element.is_empty(),
        PseudoClass::Checked => match element.tag_name() {
            "option" => element.has_attribute("selected"),
            _ => element.has_attribute("checked"),
        },
        PseudoClass::Disabled => element.has_attribute("disabled"),
        PseudoClass::Enabled => !element.has_attribute("disabled"),
        PseudoClass::Not(list) => !list.matches(element),
    }
}

impl NthExpr {
    /// Check if a 1-based index matches this expression
    pub fn matches(&self, index: i32) -> bool {
        if self.a == 0 {
            return index == self.b;
        }

        let diff = index - self.b;
        diff / self.a >= 0 && diff % self.a == 0
    }

    /// Parse an An+B expression
    pub fn parse(expr: &str) -> Option<Self> {
        let expr: String = expr
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        match expr.as_str() {
            "odd" => return Some(Self { a: 2, b: 1 }),
            "even" => return Some(Self { a: 2, b: 0 }),
            _ => {}
        }

        if let Ok(n) = expr.parse::<i32>() {
            return Some(Self { a: 0, b: n });
        }

        let (a_part, b_part) = expr.split_once('n')?;
        let a = match a_part {
            "" | "+" => 1,
            "-" => -1,
            s => s.parse().ok()?,
        };
        let b = match b_part {
            "" => 0,
            s => s.trim_start_matches('+').parse().ok()?,
        };
        Some(Self { a, b })
    }
}

/// Recursive descent parser over the selector text
struct SelectorParser<'s> {
    source: &'s str,
    input: Vec<char>,
    pos: usize,
}

impl<'s> SelectorParser<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            input: source.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> ScrapeError {
        ScrapeError::selector(self.source, reason)
    }

    fn parse_list(&mut self) -> Result<SelectorList, ScrapeError> {
        let mut selectors = vec![self.parse_complex()?];
        while self.peek() == Some(',') {
            self.advance();
            self.skip_whitespace();
            selectors.push(self.parse_complex()?);
        }

        self.skip_whitespace();
        match self.peek() {
            None | Some(')') => Ok(SelectorList { selectors }),
            Some(c) => Err(self.error(format!("unexpected '{}'", c))),
        }
    }

    fn parse_complex(&mut self) -> Result<Selector, ScrapeError> {
        self.skip_whitespace();
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') | Some(')') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::AdjacentSibling,
                Some('~') => Combinator::GeneralSibling,
                Some(_) if had_space => Combinator::Descendant,
                Some(c) => return Err(self.error(format!("unexpected '{}'", c))),
            };
            if combinator != Combinator::Descendant {
                self.advance();
                self.skip_whitespace();
            }
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        compounds.reverse();
        combinators.reverse();
        Ok(Selector {
            compounds,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> Result<Compound, ScrapeError> {
        let mut parts = Vec::new();

        while let Some(c) = self.peek() {
            match c {
                '#' => {
                    self.advance();
                    parts.push(SelectorPart::Id(self.read_identifier()?));
                }
                '.' => {
                    self.advance();
                    parts.push(SelectorPart::Class(self.read_identifier()?));
                }
                '[' => parts.push(SelectorPart::Attribute(self.parse_attribute()?)),
                ':' => parts.push(SelectorPart::PseudoClass(self.parse_pseudo()?)),
                '*' => {
                    self.advance();
                    parts.push(SelectorPart::Universal);
                }
                c if c.is_alphabetic() || c == '_' || c == '-' => {
                    let tag = self.read_identifier()?;
                    parts.push(SelectorPart::Tag(tag.to_lowercase()));
                }
                _ => break,
            }
        }

        if parts.is_empty() {
            return Err(self.error("expected a selector"));
        }
        Ok(Compound { parts })
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        self.pos += 1;
        c
    }

    /// Returns true when something was skipped
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
        self.pos > start
    }

    fn read_identifier(&mut self) -> Result<String, ScrapeError> {
        let mut result = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                result.push(c);
                self.advance();
            } else if c == '\\' {
                self.advance();
                if let Some(escaped) = self.advance() {
                    result.push(escaped);
                }
            } else {
                break;
            }
        }
        if result.is_empty() {
            return Err(self.error("expected identifier"));
        }
        Ok(result)
    }

    fn parse_attribute(&mut self) -> Result<AttributeSelector, ScrapeError> {
        self.advance(); // '['
        self.skip_whitespace();
        let name = self.read_identifier()?.to_lowercase();
        self.skip_whitespace();

        let mut operator = None;
        let mut value = None;
        let mut case_insensitive = false;

        if let Some(c) = self.peek() {
            if c != ']' {
                self.advance();
                let op = match c {
                    '=' => AttributeOperator::Equals,
                    '~' => AttributeOperator::Includes,
                    '|' => AttributeOperator::DashMatch,
                    '^' => AttributeOperator::Prefix,
                    '$' => AttributeOperator::Suffix,
                    '*' => AttributeOperator::Substring,
                    _ => return Err(self.error(format!("unknown attribute operator '{}'", c))),
                };
                if op != AttributeOperator::Equals {
                    self.expect('=')?;
                }
                operator = Some(op);

                self.skip_whitespace();
                value = Some(self.read_string_or_ident()?);
                self.skip_whitespace();

                if let Some('i') | Some('I') = self.peek() {
                    case_insensitive = true;
                    self.advance();
                    self.skip_whitespace();
                }
            }
        }

        self.expect(']')?;

        Ok(AttributeSelector {
            name,
            operator,
            value,
            case_insensitive,
        })
    }

    fn parse_pseudo(&mut self) -> Result<PseudoClass, ScrapeError> {
        self.advance(); // ':'
        let name = self.read_identifier()?.to_lowercase();

        let pseudo = match name.as_str() {
            "first-child" => PseudoClass::FirstChild,
            "last-child" => PseudoClass::LastChild,
            "only-child" => PseudoClass::OnlyChild,
            "empty" => PseudoClass::Empty,
            "checked" => PseudoClass::Checked,
            "disabled" => PseudoClass::Disabled,
            "enabled" => PseudoClass::Enabled,
            "nth-child" => {
                let expr = self.read_function_arg()?;
                PseudoClass::NthChild(
                    NthExpr::parse(&expr)
                        .ok_or_else(|| self.error(format!("invalid nth expression '{}'", expr)))?,
                )
            }
            "not" => {
                self.expect('(')?;
                let inner = self.parse_list()?;
                self.expect(')')?;
                PseudoClass::Not(inner)
            }
            other => return Err(self.error(format!("unsupported pseudo-class ':{}'", other))),
        };

        Ok(pseudo)
    }

    fn read_function_arg(&mut self) -> Result<String, ScrapeError> {
        self.expect('(')?;
        let mut result = String::new();
        loop {
            match self.advance() {
                Some(')') => break,
                Some(c) => result.push(c),
                None => return Err(self.error("unclosed '('")),
            }
        }
        Ok(result.trim().to_string())
    }

    fn read_string_or_ident(&mut self) -> Result<String, ScrapeError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.advance();
                let mut result = String::new();
                loop {
                    match self.advance() {
                        Some(c) if c == quote => break,
                        Some('\\') => {
                            if let Some(escaped) = self.advance() {
                                result.push(escaped);
                            }
                        }
                        Some(c) => result.push(c),
                        None => return Err(self.error("unterminated string")),
                    }
                }
                Ok(result)
            }
            _ => self.read_identifier(),
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ScrapeError> {
        match self.advance() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.error(format!("expected '{}', got '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', got end of input", expected))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn ids(doc: &Document, selector: &str) -> Vec<String> {
        doc.query_selector_all(selector)
            .unwrap()
            .iter()
            .filter_map(|e| e.attr("id").map(String::from))
            .collect()
    }

    #[test]
    fn test_selector_parsing() {
        for valid in [
            "div",
            ".class",
            "#id",
            "[attr]",
            "[attr=value]",
            "div.class#id",
            "form input, form select",
            "#divCaptcha > img",
            "a + b ~ c",
            "input:not([type=submit])",
        ] {
            assert!(SelectorList::parse(valid).is_ok(), "{}", valid);
        }

        for invalid in ["", "div >", "[attr", "a:hover", ">", "a,"] {
            assert!(SelectorList::parse(invalid).is_err(), "{}", invalid);
        }
    }

    #[test]
    fn test_descendant_and_child() {
        let doc = Document::parse(
            r#"<div id="divCaptcha"><img id="direct"><span><img id="nested"></span></div>"#,
        );
        assert_eq!(ids(&doc, "#divCaptcha > img"), vec!["direct"]);
        assert_eq!(ids(&doc, "#divCaptcha img"), vec!["direct", "nested"]);
    }

    #[test]
    fn test_sibling_combinators() {
        let doc = Document::parse("<p id=a></p><p id=b></p><p id=c></p>");
        assert_eq!(ids(&doc, "#a + p"), vec!["b"]);
        assert_eq!(ids(&doc, "#a ~ p"), vec!["b", "c"]);
    }

    #[test]
    fn test_selector_list_keeps_document_order() {
        let doc = Document::parse(
            r#"<form><select id=s></select><input id=i><textarea id=t></textarea></form>"#,
        );
        assert_eq!(ids(&doc, "form input, form select"), vec!["s", "i"]);
    }

    #[test]
    fn test_attribute_operators() {
        let doc = Document::parse(
            r#"<meta id=m http-equiv="Refresh"><input id=x name="user-id" type="TEXT">"#,
        );
        assert_eq!(ids(&doc, "[http-equiv=refresh i]"), vec!["m"]);
        assert!(ids(&doc, "[http-equiv=refresh]").is_empty());
        assert_eq!(ids(&doc, "[name|=user]"), vec!["x"]);
        assert_eq!(ids(&doc, "[name^=us][name$=id]"), vec!["x"]);
        assert_eq!(ids(&doc, "input:not([type=hidden])"), vec!["x"]);
    }

    #[test]
    fn test_pseudo_classes() {
        let doc = Document::parse(
            "<ul><li id=a></li><li id=b checked></li><li id=c>x</li></ul>",
        );
        assert_eq!(ids(&doc, "li:first-child"), vec!["a"]);
        assert_eq!(ids(&doc, "li:last-child"), vec!["c"]);
        assert_eq!(ids(&doc, "li:nth-child(2)"), vec!["b"]);
        assert_eq!(ids(&doc, "li:checked"), vec!["b"]);
        assert_eq!(ids(&doc, "li:empty"), vec!["a", "b"]);
    }

    #[test]
    fn test_nth_expr() {
        let odd = NthExpr::parse("odd").unwrap();
        assert!(odd.matches(1));
        assert!(!odd.matches(2));
        assert!(odd.matches(3));

        let expr = NthExpr::parse("2n + 1").unwrap();
        assert_eq!(expr, NthExpr { a: 2, b: 1 });

        let first_two = NthExpr::parse("-n+2").unwrap();
        assert!(first_two.matches(1));
        assert!(first_two.matches(2));
        assert!(!first_two.matches(3));
    }
}
