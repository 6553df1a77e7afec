// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Element handle borrowed from a document

use super::document::Document;
use super::node::{NodeData, NodeId, NodeType};
use super::selector::SelectorList;
use crate::error::ScrapeError;

/// Element node of a [`Document`]
#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> PartialEq for Element<'a> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl<'a> Element<'a> {
    pub(crate) fn new(doc: &'a Document, id: NodeId) -> Self {
        Self { doc, id }
    }

    fn data(&self) -> Option<&'a NodeData> {
        self.doc.node(self.id)
    }

    /// Node identifier
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Lowercase tag name
    pub fn tag_name(&self) -> &'a str {
        self.data()
            .and_then(|d| d.tag_name.as_deref())
            .unwrap_or_default()
    }

    /// Get an attribute value, names are case-insensitive
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        let data = self.data()?;
        data.attributes
            .get(name)
            .or_else(|| data.attributes.get(&name.to_lowercase()))
            .map(String::as_str)
    }

    /// Check if an attribute is present
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Check if the class list contains `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Concatenated text of every descendant text node
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(self.id, &mut text);
        text
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(data) = self.doc.node(id) else {
            return;
        };
        if data.node_type == NodeType::Text {
            if let Some(ref t) = data.text {
                out.push_str(t);
            }
        }
        for &child in &data.children {
            self.collect_text(child, out);
        }
    }

    /// Parent element, None at the top of the tree
    pub fn parent(&self) -> Option<Element<'a>> {
        self.data()
            .and_then(|d| d.parent)
            .and_then(|p| self.doc.element(p))
    }

    /// Child elements
    pub fn children(&self) -> Vec<Element<'a>> {
        self.data()
            .map(|d| {
                d.children
                    .iter()
                    .filter_map(|&c| self.doc.element(c))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn siblings(&self) -> Vec<Element<'a>> {
        match self.data().and_then(|d| d.parent).and_then(|p| self.doc.node(p)) {
            Some(parent) => parent
                .children
                .iter()
                .filter_map(|&c| self.doc.element(c))
                .collect(),
            None => vec![*self],
        }
    }

    /// 1-based position among the parent's child elements
    pub fn element_index(&self) -> usize {
        self.siblings()
            .iter()
            .position(|s| s.id == self.id)
            .map(|p| p + 1)
            .unwrap_or(1)
    }

    /// Number of child elements of the parent
    pub fn sibling_count(&self) -> usize {
        self.siblings().len()
    }

    /// Element immediately before this one
    pub fn prev_element_sibling(&self) -> Option<Element<'a>> {
        let siblings = self.siblings();
        let pos = siblings.iter().position(|s| s.id == self.id)?;
        pos.checked_sub(1).map(|p| siblings[p])
    }

    /// Check if the element has neither child elements nor text
    pub fn is_empty(&self) -> bool {
        self.data()
            .map(|d| {
                d.children.iter().all(|&c| {
                    self.doc
                        .node(c)
                        .map_or(true, |n| n.node_type == NodeType::Comment)
                })
            })
            .unwrap_or(true)
    }

    /// Check if `other` is an ancestor of this element
    pub fn is_descendant_of(&self, other: &Element<'_>) -> bool {
        let mut current = self.parent();
        while let Some(el) = current {
            if el.id == other.id {
                return true;
            }
            current = el.parent();
        }
        false
    }

    /// Descendant elements matching a selector list, in document order
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Element<'a>>, ScrapeError> {
        let selector = SelectorList::parse(selector)?;
        Ok(self
            .doc
            .elements()
            .filter(|e| e.is_descendant_of(self) && selector.matches(e))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::Document;

    #[test]
    fn test_navigation() {
        let doc = Document::parse("<ul><li id=a>one</li><!-- x --><li id=b>two</li></ul>");
        let b = doc.query_selector("#b").unwrap().unwrap();

        assert_eq!(b.tag_name(), "li");
        assert_eq!(b.element_index(), 2);
        assert_eq!(b.sibling_count(), 2);
        assert_eq!(b.prev_element_sibling().and_then(|e| e.attr("id")), Some("a"));
        assert_eq!(b.parent().map(|p| p.tag_name()), Some("ul"));
    }

    #[test]
    fn test_text_content_and_scoped_query() {
        let doc = Document::parse("<div id=box><span>Hola</span> <b>mundo</b></div><span>x</span>");
        let div = doc.query_selector("#box").unwrap().unwrap();

        assert_eq!(div.text_content(), "Holamundo");
        assert_eq!(div.query_selector_all("span").unwrap().len(), 1);
        assert!(!div.is_empty());
    }
}
