//! fOS DOM - Document Object Model
//!
//! Arena-backed DOM tree with the element-level surface page scripts need:
//! selector queries, class token lists and inner-markup serialization.

mod node;
mod tree;
mod document;
mod classlist;
mod selector;
mod serialize;

pub use node::{Node, NodeData, ElementData, Attribute};
pub use tree::{DomTree, Children, Descendants};
pub use document::Document;
pub use classlist::ClassList;
pub use selector::SelectorList;
pub use serialize::{inner_html, outer_html};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Whether this ID points at a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// DOM error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("no such node: {0}")]
    NoSuchNode(NodeId),

    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("invalid class token '{0}'")]
    InvalidToken(String),

    #[error("markup error: {0}")]
    Markup(String),
}
