// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Form field extraction

use regex::Regex;

use super::FormFields;
use crate::dom::{Document, Element};
use crate::error::ScrapeError;

/// Input types that are never sent as form values
const BUTTON_TYPES: [&str; 3] = ["submit", "reset", "button"];

/// Values of the form controls found under a parent selector
#[derive(Debug, Clone)]
pub struct HtmlForm {
    document: Document,
    parent_selector: String,
    exclude_patterns: Vec<Regex>,
}

impl HtmlForm {
    /// Create a form reader without name exclusions
    pub fn new(html: &str, parent_selector: impl Into<String>) -> Self {
        Self {
            document: Document::parse(html),
            parent_selector: parent_selector.into(),
            exclude_patterns: Vec::new(),
        }
    }

    /// Create a form reader that skips every element whose name matches one of `patterns`
    pub fn with_exclude_patterns(
        html: &str,
        parent_selector: impl Into<String>,
        patterns: &[&str],
    ) -> Result<Self, ScrapeError> {
        let exclude_patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|source| ScrapeError::Pattern {
                    pattern: p.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            exclude_patterns,
            ..Self::new(html, parent_selector)
        })
    }

    /// Selector of the container the controls are read from
    pub fn parent_selector(&self) -> &str {
        &self.parent_selector
    }

    /// Inputs and selects merged; a select wins over an input with the same name
    pub fn get_form_values(&self) -> FormFields {
        let mut values = self.read_input_values();
        values.extend(self.read_select_values());
        values
    }

    /// Inputs except submit, reset and button
    pub fn read_input_values(&self) -> FormFields {
        self.read_form_elements_values("input", &BUTTON_TYPES)
    }

    /// Selects with the value of their first selected option, or empty
    pub fn read_select_values(&self) -> FormFields {
        self.filter_elements("select")
            .into_iter()
            .filter_map(|select| {
                let name = self.submittable_name(&select)?;
                let value = select
                    .query_selector_all("option")
                    .unwrap_or_default()
                    .into_iter()
                    .find(|option| is_truthy(option.attr("selected")))
                    .and_then(|option| option.attr("value"))
                    .unwrap_or_default();
                Some((name, value.to_string()))
            })
            .collect()
    }

    /// Name/value pairs of the `element` tags under the parent selector.
    ///
    /// Elements whose lowercase `type` is listed in `exclude_types` are skipped,
    /// radios and checkboxes only count when checked.
    pub fn read_form_elements_values(&self, element: &str, exclude_types: &[&str]) -> FormFields {
        let exclude_types: Vec<String> = exclude_types.iter().map(|t| t.to_lowercase()).collect();

        self.filter_elements(element)
            .into_iter()
            .filter_map(|el| {
                let name = self.submittable_name(&el)?;
                let kind = el.attr("type").unwrap_or_default().to_lowercase();
                if exclude_types.contains(&kind) {
                    return None;
                }
                if (kind == "radio" || kind == "checkbox") && !is_truthy(el.attr("checked")) {
                    return None;
                }
                Some((name, el.attr("value").unwrap_or_default().to_string()))
            })
            .collect()
    }

    /// Check if a name is matched by any exclusion pattern
    pub fn element_name_is_excluded(&self, name: &str) -> bool {
        self.exclude_patterns.iter().any(|p| p.is_match(name))
    }

    fn submittable_name(&self, element: &Element<'_>) -> Option<String> {
        let name = element.attr("name").filter(|n| !n.is_empty())?;
        if self.element_name_is_excluded(name) {
            return None;
        }
        Some(name.to_string())
    }

    fn filter_elements(&self, element: &str) -> Vec<Element<'_>> {
        let selector = format!("{} {}", self.parent_selector, element);
        match self.document.query_selector_all(&selector) {
            Ok(elements) => elements,
            Err(err) => {
                tracing::debug!(selector = %selector, error = %err, "Unusable form selector");
                Vec::new()
            }
        }
    }
}

/// Boolean attribute check: present and not "0"
fn is_truthy(value: Option<&str>) -> bool {
    matches!(value, Some(v) if v != "0")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_FORM: &str = concat!(
        r#"<form><input name="key" value="value">"#,
        r#"<select name="otherKey"><option value="option1">option1</option>"#,
        r#"<option value="option2">option2</option></select></form>"#
    );

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_get_form_values() {
        let form = HtmlForm::new(BASIC_FORM, "form");
        assert_eq!(
            form.get_form_values(),
            fields(&[("key", "value"), ("otherKey", "")])
        );
        assert_eq!(form.read_input_values(), fields(&[("key", "value")]));
        assert_eq!(form.read_select_values(), fields(&[("otherKey", "")]));
    }

    #[test]
    fn test_select_with_selected_option() {
        let html = concat!(
            r#"<form><select name="otherKey"><option value="option1">option1</option>"#,
            r#"<option value="option2" selected>option2</option>"#,
            r#"<option value="option3" selected>option3</option></select></form>"#
        );
        let form = HtmlForm::new(html, "form");
        assert_eq!(form.read_select_values(), fields(&[("otherKey", "option2")]));
    }

    #[test]
    fn test_select_with_zero_selected_is_not_selected() {
        let html = r#"<form><select name="s"><option value="a" selected="0">a</option></select></form>"#;
        assert_eq!(HtmlForm::new(html, "form").read_select_values(), fields(&[("s", "")]));
    }

    #[test]
    fn test_select_excluded_by_name() {
        let html = concat!(
            r#"<form><select name="foo"><option value="x-foo" selected>x-foo</option></select>"#,
            r#"<select name="bar"><option value="x-foo">x-foo</option>"#,
            r#"<option value="x-bar" selected>x-bar</option></select></form>"#
        );
        let form = HtmlForm::with_exclude_patterns(html, "form", &["^foo$"]).unwrap();
        assert_eq!(form.read_select_values(), fields(&[("bar", "x-bar")]));
    }

    #[test]
    fn test_missing_element_kind() {
        let form = HtmlForm::new(BASIC_FORM, "form");
        assert!(form.read_form_elements_values("textarea", &[]).is_empty());
    }

    #[test]
    fn test_elements_outside_parent_are_ignored() {
        let form = HtmlForm::new(r#"<form></form><input name="key" value="myValue">"#, "form");
        assert!(form.read_form_elements_values("input", &[]).is_empty());
    }

    #[test]
    fn test_only_checked_radios() {
        let html = concat!(
            r#"<form><input name="foo" type="radio" value="1">"#,
            r#"<input name="foo" type="radio" value="2" checked="checked">"#,
            r#"<input name="bar" type="RADIO" value="1" checked>"#,
            r#"<input name="bar" type="radio" value="2">"#,
            r#"<input name="baz" type="checkbox" value="on" checked="0"></form>"#
        );
        let form = HtmlForm::new(html, "form");
        assert_eq!(form.read_input_values(), fields(&[("foo", "2"), ("bar", "1")]));
    }

    #[test]
    fn test_buttons_and_excluded_types() {
        let html = concat!(
            r#"<form><input name="hide" type="hidden" value="x-hidden">"#,
            r#"<input name="show" type="text" value="x-text">"#,
            r#"<input name="go" type="Submit" value="Enviar">"#,
            r#"<input name="clear" type="reset"><input type="text" value="nameless"></form>"#
        );
        let form = HtmlForm::new(html, "form");
        assert_eq!(
            form.read_form_elements_values("input", &["HIDDEN"]),
            fields(&[("show", "x-text"), ("go", "Enviar"), ("clear", "")])
        );
        assert_eq!(
            form.read_input_values(),
            fields(&[("hide", "x-hidden"), ("show", "x-text")])
        );
    }

    #[test]
    fn test_name_pattern_exclusion() {
        let html = concat!(
            r#"<form><input name="ignore_1" value=""><input name="ignore_2" value="">"#,
            r#"<input name="no-ignore" value=""></form>"#
        );
        let form = HtmlForm::with_exclude_patterns(html, "form", &["^ignore.+"]).unwrap();
        assert_eq!(form.read_input_values(), fields(&[("no-ignore", "")]));
        assert!(form.element_name_is_excluded("ignore_3"));
        assert!(!form.element_name_is_excluded("ignore"));
    }

    #[test]
    fn test_invalid_pattern_is_error() {
        let err = HtmlForm::with_exclude_patterns("<form></form>", "form", &["(unclosed"]);
        assert!(matches!(err, Err(ScrapeError::Pattern { .. })));
    }

    #[test]
    fn test_invalid_parent_selector_yields_nothing() {
        let form = HtmlForm::new(BASIC_FORM, "form[");
        assert!(form.get_form_values().is_empty());
    }

    #[test]
    fn test_scoped_parent() {
        let html = concat!(
            r#"<form id="other"><input name="a" value="1"></form>"#,
            r#"<form id="login"><div><input name="b" value="2"></div></form>"#
        );
        let form = HtmlForm::new(html, "form#login");
        assert_eq!(form.get_form_values(), fields(&[("b", "2")]));
    }
}
