//! Document - High-level document API

use crate::{ClassList, DomError, DomTree, NodeId, SelectorList};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a document with an empty `html/head/body` skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Locate `html`, `head` and `body` after the tree was built externally.
    pub fn finalize(&mut self) {
        self.html_element = self.child_element(self.tree.root(), "html");
        self.head_element = self.child_element(self.html_element, "head");
        self.body_element = self.child_element(self.html_element, "body");
        tracing::trace!(
            html = %self.html_element,
            head = %self.head_element,
            body = %self.body_element,
            "document finalized"
        );
    }

    fn child_element(&self, parent: NodeId, tag: &str) -> NodeId {
        if !parent.is_valid() {
            return NodeId::NONE;
        }
        self.tree
            .children(parent)
            .find(|(_, node)| node.as_element().is_some_and(|e| e.local_name == tag))
            .map_or(NodeId::NONE, |(id, _)| id)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Text of the first `<title>` in `<head>`
    pub fn title(&self) -> String {
        if !self.head_element.is_valid() {
            return String::new();
        }
        let title = self.child_element(self.head_element, "title");
        self.tree
            .children(title)
            .find_map(|(_, child)| child.as_text())
            .map(|t| t.trim().to_string())
            .unwrap_or_default()
    }

    /// `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// `<head>` element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// `<body>` element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// First element whose `id` attribute equals `id`
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .find(|&node| self.tree.element(node).is_ok_and(|e| e.id() == Some(id)))
    }

    /// All elements matching `selector`, in document order
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let list = SelectorList::parse(selector)?;
        let found = list.select_all(&self.tree, self.tree.root());
        tracing::trace!(selector, count = found.len(), "querySelectorAll");
        Ok(found)
    }

    /// First element matching `selector`
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, DomError> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .tree
            .descendants(self.tree.root())
            .find(|&id| list.matches(&self.tree, id)))
    }

    /// Serialized children of `element`
    pub fn inner_html(&self, element: NodeId) -> Result<String, DomError> {
        self.tree.element(element)?;
        Ok(crate::inner_html(&self.tree, element))
    }

    /// Serialized `element` including itself
    pub fn outer_html(&self, element: NodeId) -> Result<String, DomError> {
        self.tree.element(element)?;
        Ok(crate::outer_html(&self.tree, element))
    }

    /// Snapshot of `element`'s class list
    pub fn class_list(&self, element: NodeId) -> Result<ClassList, DomError> {
        Ok(self.tree.element(element)?.class_list())
    }

    pub fn add_class(&mut self, element: NodeId, token: &str) -> Result<(), DomError> {
        ClassList::validate(token)?;
        self.tree.element_mut(element)?.update_class_list(|list| list.add(token));
        Ok(())
    }

    pub fn remove_class(&mut self, element: NodeId, token: &str) -> Result<(), DomError> {
        ClassList::validate(token)?;
        self.tree.element_mut(element)?.update_class_list(|list| list.remove(token));
        Ok(())
    }

    /// Toggle `token`, returning whether it is now present
    pub fn toggle_class(&mut self, element: NodeId, token: &str) -> Result<bool, DomError> {
        ClassList::validate(token)?;
        Ok(self
            .tree
            .element_mut(element)?
            .update_class_list(|list| list.toggle(token, None)))
    }

    pub fn has_class(&self, element: NodeId, token: &str) -> Result<bool, DomError> {
        ClassList::validate(token)?;
        Ok(self.tree.element(element)?.class_list().contains(token))
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
