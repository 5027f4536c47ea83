//! Selections
//!
//! A selection is the indexed list of elements a selector resolved to when
//! it was built. It never grows or shrinks afterwards. Instance methods act
//! on the first element, except the markup getter which reads all of them.

use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use fos_dom::NodeId;

use crate::error::Result;
use crate::host::{read_host, write_host, DomHost, SharedHost};
use crate::query::Behavior;

/// What a constructor call may be given
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectorInput {
    /// A selector string resolved by the host
    Selector(String),
    /// Several selector strings, resolved as one comma-joined group
    Selectors(Vec<String>),
    /// Elements bound as-is
    Elements(Vec<NodeId>),
    /// Nothing; yields an empty selection
    #[default]
    Empty,
}

impl From<&str> for SelectorInput {
    fn from(selector: &str) -> Self {
        SelectorInput::Selector(selector.to_string())
    }
}

impl From<String> for SelectorInput {
    fn from(selector: String) -> Self {
        SelectorInput::Selector(selector)
    }
}

impl From<Vec<String>> for SelectorInput {
    fn from(selectors: Vec<String>) -> Self {
        SelectorInput::Selectors(selectors)
    }
}

impl From<&[&str]> for SelectorInput {
    fn from(selectors: &[&str]) -> Self {
        SelectorInput::Selectors(selectors.iter().map(|s| s.to_string()).collect())
    }
}

impl From<NodeId> for SelectorInput {
    fn from(element: NodeId) -> Self {
        SelectorInput::Elements(vec![element])
    }
}

impl From<Vec<NodeId>> for SelectorInput {
    fn from(elements: Vec<NodeId>) -> Self {
        SelectorInput::Elements(elements)
    }
}

impl From<&[NodeId]> for SelectorInput {
    fn from(elements: &[NodeId]) -> Self {
        SelectorInput::Elements(elements.to_vec())
    }
}

impl<H> From<&Selection<H>> for SelectorInput {
    fn from(selection: &Selection<H>) -> Self {
        SelectorInput::Elements(selection.elements.clone())
    }
}

impl From<Option<&str>> for SelectorInput {
    fn from(selector: Option<&str>) -> Self {
        selector.map_or(SelectorInput::Empty, SelectorInput::from)
    }
}

impl From<()> for SelectorInput {
    fn from(_: ()) -> Self {
        SelectorInput::Empty
    }
}

/// One element's inner markup, as returned by [`Selection::html`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupEntry {
    pub element: NodeId,
    pub markup: String,
}

/// Result of the combined markup accessor
#[derive(Debug)]
pub enum Markup<'s, H> {
    /// Markup was written; the selection for chaining
    Set(&'s Selection<H>),
    /// Markup of every element, in selection order
    Get(Vec<MarkupEntry>),
}

/// Elements bound by a constructor call
pub struct Selection<H> {
    host: SharedHost<H>,
    elements: Vec<NodeId>,
    behavior: Arc<Behavior>,
}

impl<H> Selection<H> {
    pub(crate) fn new(host: SharedHost<H>, elements: Vec<NodeId>, behavior: Arc<Behavior>) -> Self {
        Self { host, elements, behavior }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.elements.get(index).copied()
    }

    pub fn first(&self) -> Option<NodeId> {
        self.get(0)
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, NodeId>> {
        self.elements.iter().copied()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.elements
    }

    /// Document this selection reads and writes
    pub fn host(&self) -> &SharedHost<H> {
        &self.host
    }

    /// Call `f(element, index)` for every element, in order
    pub fn each(&self, mut f: impl FnMut(NodeId, usize)) -> &Self {
        for (index, &element) in self.elements.iter().enumerate() {
            f(element, index);
        }
        self
    }
}

impl<H: DomHost> Selection<H> {
    /// Inner markup of every element, in selection order
    pub fn html(&self) -> Result<Vec<MarkupEntry>> {
        let host = read_host(&self.host);
        let mut entries = Vec::with_capacity(self.elements.len());
        for &element in &self.elements {
            entries.push(MarkupEntry { element, markup: host.markup(element)? });
        }
        Ok(entries)
    }

    /// Replace the inner markup of the first element
    pub fn set_html(&self, markup: &str) -> Result<&Self> {
        let Some(first) = self.first() else {
            tracing::trace!("set_html on empty selection");
            return Ok(self);
        };
        write_host(&self.host).set_markup(first, markup)?;
        tracing::debug!(element = %first, bytes = markup.len(), "markup set");
        Ok(self)
    }

    /// Write the first element's markup when `value` is given, otherwise
    /// read every element's markup.
    pub fn markup(&self, value: Option<&str>) -> Result<Markup<'_, H>> {
        match value {
            Some(markup) => self.set_html(markup).map(Markup::Set),
            None => self.html().map(Markup::Get),
        }
    }

    pub fn add_class(&self, name: &str) -> Result<&Self> {
        if let Some(first) = self.target("add_class", name)? {
            write_host(&self.host).class_add(first, name)?;
        }
        Ok(self)
    }

    pub fn remove_class(&self, name: &str) -> Result<&Self> {
        if let Some(first) = self.target("remove_class", name)? {
            write_host(&self.host).class_remove(first, name)?;
        }
        Ok(self)
    }

    pub fn toggle_class(&self, name: &str) -> Result<&Self> {
        if let Some(first) = self.target("toggle_class", name)? {
            let present = write_host(&self.host).class_toggle(first, name)?;
            tracing::trace!(element = %first, name, present, "class toggled");
        }
        Ok(self)
    }

    /// Whether the first element carries class `name`
    pub fn has_class(&self, name: &str) -> Result<bool> {
        match self.target("has_class", name)? {
            Some(first) => Ok(read_host(&self.host).class_contains(first, name)?),
            None => Ok(false),
        }
    }

    /// First element, when there is one and `name` is usable.
    fn target(&self, origin: &str, name: &str) -> Result<Option<NodeId>> {
        if !self.behavior.accepts_class_name(origin, name)? {
            return Ok(None);
        }
        Ok(self.first())
    }
}

impl<H> Clone for Selection<H> {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
            elements: self.elements.clone(),
            behavior: Arc::clone(&self.behavior),
        }
    }
}

impl<H> fmt::Debug for Selection<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selection")
            .field("length", &self.elements.len())
            .field("elements", &self.elements)
            .finish()
    }
}

impl<H> Index<usize> for Selection<H> {
    type Output = NodeId;

    fn index(&self, index: usize) -> &NodeId {
        &self.elements[index]
    }
}

impl<'a, H> IntoIterator for &'a Selection<H> {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
