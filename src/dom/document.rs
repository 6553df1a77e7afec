// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Parsed HTML document

use super::element::Element;
use super::node::{NodeData, NodeId};
use super::parser::parse_html;
use super::selector::SelectorList;
use crate::error::ScrapeError;

/// Read-only HTML document stored as an arena of nodes in document order
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding only the root node
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::document()],
        }
    }

    /// Parse HTML into a document
    pub fn parse(html: &str) -> Self {
        parse_html(html)
    }

    /// Root (document) node
    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a node under `parent`; nodes must be pushed in document order
    pub(crate) fn push(&mut self, mut data: NodeData, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len());
        data.parent = Some(parent);
        self.nodes.push(data);
        if let Some(parent) = self.nodes.get_mut(parent.0) {
            parent.children.push(id);
        }
        id
    }

    /// Get node data
    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0)
    }

    /// Get an element handle, None for non-element nodes
    pub fn element(&self, id: NodeId) -> Option<Element<'_>> {
        self.node(id)
            .filter(|n| n.is_element())
            .map(|_| Element::new(self, id))
    }

    /// All elements in document order
    pub fn elements(&self) -> impl Iterator<Item = Element<'_>> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_element())
            .map(move |(idx, _)| Element::new(self, NodeId(idx)))
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the document holds only the root node
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// All elements matching a selector list, in document order
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Element<'_>>, ScrapeError> {
        let selector = SelectorList::parse(selector)?;
        Ok(self.select(&selector))
    }

    /// First element matching a selector list
    pub fn query_selector(&self, selector: &str) -> Result<Option<Element<'_>>, ScrapeError> {
        let selector = SelectorList::parse(selector)?;
        Ok(self.elements().find(|e| selector.matches(e)))
    }

    /// All elements matching an already parsed selector
    pub fn select(&self, selector: &SelectorList) -> Vec<Element<'_>> {
        self.elements().filter(|e| selector.matches(e)).collect()
    }
}
