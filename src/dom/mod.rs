// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Read-only DOM for scraping portal pages
//!
//! html5ever builds the tree, which is copied into an arena and queried
//! with CSS selectors.

mod document;
mod element;
mod node;
mod parser;
mod selector;

pub use document::Document;
pub use element::Element;
pub use node::{NodeData, NodeId, NodeType};
pub use parser::parse_html;
pub use selector::{Combinator, NthExpr, Selector, SelectorList};
