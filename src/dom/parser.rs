// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTML parser using html5ever

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use super::document::Document;
use super::node::{NodeData, NodeId};

/// Parse an HTML string into a Document.
///
/// Parsing never fails: malformed markup is repaired the way browsers do it,
/// and an empty input yields a document with empty `html`, `head` and `body`.
pub fn parse_html(html: &str) -> Document {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);

    let mut doc = Document::new();
    let root = doc.root_id();
    DomConverter { doc: &mut doc }.convert_children(&dom.document, root);
    doc
}

/// Copies the html5ever tree into the document arena in document order
struct DomConverter<'a> {
    doc: &'a mut Document,
}

impl<'a> DomConverter<'a> {
    fn convert_children(&mut self, handle: &Handle, parent_id: NodeId) {
        for child in handle.children.borrow().iter() {
            self.convert_node(child, parent_id);
        }
    }

    fn convert_node(&mut self, handle: &Handle, parent_id: NodeId) {
        let data = match handle.data {
            RcNodeData::Text { ref contents } => {
                let text = contents.borrow().to_string();
                // Whitespace between tags carries nothing for scraping
                if text.trim().is_empty() {
                    return;
                }
                NodeData::text(text)
            }
            RcNodeData::Comment { ref contents } => NodeData::comment(contents.to_string()),
            RcNodeData::Element {
                ref name,
                ref attrs,
                ..
            } => {
                let mut data = NodeData::element(name.local.to_string());
                for attr in attrs.borrow().iter() {
                    data.attributes
                        .entry(attr.name.local.to_string().to_lowercase())
                        .or_insert_with(|| attr.value.to_string());
                }
                data
            }
            RcNodeData::Document
            | RcNodeData::Doctype { .. }
            | RcNodeData::ProcessingInstruction { .. } => return,
        };

        let node_id = self.doc.push(data, parent_id);
        self.convert_children(handle, node_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_html() {
        let doc = parse_html("<html><body><p>Hello</p></body></html>");
        let p = doc.query_selector("p").unwrap().unwrap();
        assert_eq!(p.text_content(), "Hello");
    }

    #[test]
    fn test_parse_with_attributes() {
        let doc = parse_html("<div ID=\"test\" class=\"foo bar\">content</div>");
        let div = doc.query_selector("div").unwrap().unwrap();
        assert_eq!(div.attr("id"), Some("test"));
        assert!(div.has_class("foo"));
    }

    #[test]
    fn test_parse_repairs_markup() {
        let doc = parse_html("<form><input name=a><input name=b></form><p>unclosed");
        assert_eq!(doc.query_selector_all("form input").unwrap().len(), 2);
        assert!(doc.query_selector("body > p").unwrap().is_some());
    }

    #[test]
    fn test_parse_empty_input() {
        let doc = parse_html("");
        assert!(doc.query_selector("body").unwrap().is_some());
        assert!(doc.query_selector("input").unwrap().is_none());
    }
}
