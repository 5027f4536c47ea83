//! DOM Tree (arena-based allocation)

use crate::{DomError, ElementData, Node, NodeId};

/// Arena-based DOM tree
///
/// Index 0 is always the document node. Removed subtrees stay in the arena
/// as detached nodes; their IDs remain readable but are unreachable from the
/// root.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self { nodes: vec![Node::document()] }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Element data of `id`, or the matching error
    pub fn element(&self, id: NodeId) -> Result<&ElementData, DomError> {
        self.get(id)
            .ok_or(DomError::NoSuchNode(id))?
            .as_element()
            .ok_or(DomError::NotAnElement(id))
    }

    pub fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        self.get_mut(id)
            .ok_or(DomError::NoSuchNode(id))?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))
    }

    /// Number of nodes in the arena (including detached ones)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the document node is never removed
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn create_element(&mut self, local_name: &str) -> NodeId {
        self.push(Node::element(local_name))
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content))
    }

    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.push(Node::doctype(name, public_id, system_id))
    }

    /// Append a detached node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let Some(prev_last) = self.get(parent).map(|p| p.last_child) else {
            tracing::warn!("append_child: parent {} does not exist", parent);
            return;
        };
        if self.get(child).is_none() {
            tracing::warn!("append_child: child {} does not exist", child);
            return;
        }

        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
            node.prev_sibling = prev_last;
            node.next_sibling = NodeId::NONE;
        }
        if prev_last.is_valid() {
            if let Some(prev) = self.get_mut(prev_last) {
                prev.next_sibling = child;
            }
        }
        if let Some(p) = self.get_mut(parent) {
            if !p.first_child.is_valid() {
                p.first_child = child;
            }
            p.last_child = child;
        }
    }

    /// Detach every child of `parent`; returns how many were removed.
    pub fn remove_children(&mut self, parent: NodeId) -> usize {
        let children: Vec<NodeId> = self.children(parent).map(|(id, _)| id).collect();
        for &id in &children {
            if let Some(node) = self.get_mut(id) {
                node.parent = NodeId::NONE;
                node.prev_sibling = NodeId::NONE;
                node.next_sibling = NodeId::NONE;
            }
        }
        if let Some(p) = self.get_mut(parent) {
            p.first_child = NodeId::NONE;
            p.last_child = NodeId::NONE;
        }
        children.len()
    }

    /// Parent of `id`, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Direct children of `parent`, in order
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        let next = self.get(parent).map_or(NodeId::NONE, |n| n.first_child);
        Children { tree: self, next }
    }

    /// All nodes below `root` in document (pre-)order, excluding `root`
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants { tree: self, root, next: self.get(root).map_or(NodeId::NONE, |n| n.first_child) }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Pre-order iterator over a subtree
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next;
        let node = self.tree.get(current)?;

        // Advance: first child, else next sibling of the nearest ancestor
        // that has one, stopping at the subtree root.
        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            let mut cursor = current;
            loop {
                if cursor == self.root {
                    break NodeId::NONE;
                }
                let Some(n) = self.tree.get(cursor) else { break NodeId::NONE };
                if n.next_sibling.is_valid() {
                    break n.next_sibling;
                }
                cursor = n.parent;
                if !cursor.is_valid() || cursor == self.root {
                    break NodeId::NONE;
                }
            }
        };

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, [NodeId; 4]) {
        // root > div > (p > text), span
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let p = tree.create_element("p");
        let text = tree.create_text("hi");
        let span = tree.create_element("span");
        tree.append_child(tree.root(), div);
        tree.append_child(div, p);
        tree.append_child(p, text);
        tree.append_child(div, span);
        (tree, [div, p, text, span])
    }

    #[test]
    fn test_children_in_order() {
        let (tree, [div, p, _, span]) = sample();
        let ids: Vec<_> = tree.children(div).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![p, span]);
    }

    #[test]
    fn test_descendants_document_order() {
        let (tree, [div, p, text, span]) = sample();
        let all: Vec<_> = tree.descendants(tree.root()).collect();
        assert_eq!(all, vec![div, p, text, span]);

        let under_p: Vec<_> = tree.descendants(p).collect();
        assert_eq!(under_p, vec![text]);
    }

    #[test]
    fn test_remove_children() {
        let (mut tree, [div, p, _, span]) = sample();
        assert_eq!(tree.remove_children(div), 2);
        assert_eq!(tree.children(div).count(), 0);
        assert_eq!(tree.parent(p), None);
        assert_eq!(tree.parent(span), None);
        assert_eq!(tree.descendants(tree.root()).collect::<Vec<_>>(), vec![div]);
    }

    #[test]
    fn test_element_errors() {
        let (tree, [_, _, text, _]) = sample();
        assert_eq!(tree.element(text), Err(DomError::NotAnElement(text)));
        assert_eq!(tree.element(NodeId(999)), Err(DomError::NoSuchNode(NodeId(999))));
    }
}
