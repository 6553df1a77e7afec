// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! DOM node storage

use std::collections::HashMap;

/// Index of a node inside its document arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Get the raw index
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Node type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Document,
    Element,
    Text,
    Comment,
}

/// Node as stored in the arena
#[derive(Debug, Clone)]
pub struct NodeData {
    pub node_type: NodeType,
    /// Lowercase tag name (elements only)
    pub tag_name: Option<String>,
    /// Text content (text and comment nodes)
    pub text: Option<String>,
    /// Attributes by lowercase name (elements only)
    pub attributes: HashMap<String, String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl NodeData {
    /// Create the document root
    pub fn document() -> Self {
        Self::with_type(NodeType::Document)
    }

    /// Create an element node
    pub fn element(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: Some(tag_name.into().to_lowercase()),
            ..Self::with_type(NodeType::Element)
        }
    }

    /// Create a text node
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            text: Some(content.into()),
            ..Self::with_type(NodeType::Text)
        }
    }

    /// Create a comment node
    pub fn comment(content: impl Into<String>) -> Self {
        Self {
            text: Some(content.into()),
            ..Self::with_type(NodeType::Comment)
        }
    }

    fn with_type(node_type: NodeType) -> Self {
        Self {
            node_type,
            tag_name: None,
            text: None,
            attributes: HashMap::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Check if this is an element
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }
}
