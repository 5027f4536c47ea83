//! DOM Node
//!
//! Nodes link to each other through `NodeId`s instead of pointers, so the
//! whole tree lives in one `Vec` and node handles are `Copy`.

use crate::{ClassList, NodeId};

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn detached(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(local_name: &str) -> Self {
        Self::detached(NodeData::Element(ElementData::new(local_name)))
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self::detached(NodeData::Text(content.to_string()))
    }

    /// Create a comment node
    pub fn comment(content: &str) -> Self {
        Self::detached(NodeData::Comment(content.to_string()))
    }

    /// Create a doctype node
    pub fn doctype(name: &str, public_id: &str, system_id: &str) -> Self {
        Self::detached(NodeData::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        })
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::detached(NodeData::Document)
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    /// Document root
    Document,
    /// DOCTYPE
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Element-specific data
///
/// Attribute order is preserved so serialization reproduces the source
/// markup. The class list is not cached separately: it is always read from
/// and written back to the `class` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Lowercase local tag name
    pub local_name: String,
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    pub fn new(local_name: &str) -> Self {
        Self {
            local_name: local_name.to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    /// Get an attribute value (names compare ASCII case-insensitively)
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name.eq_ignore_ascii_case(name)) {
            attr.value = value.to_string();
            return;
        }
        self.attrs.push(Attribute {
            name: name.to_ascii_lowercase(),
            value: value.to_string(),
        });
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_some()
    }

    /// The `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.get_attr("id")
    }

    /// Snapshot of the class token list
    pub fn class_list(&self) -> ClassList {
        ClassList::from_string(self.get_attr("class").unwrap_or(""))
    }

    /// Mutate the class list and write it back to the `class` attribute.
    pub fn update_class_list<R>(&mut self, f: impl FnOnce(&mut ClassList) -> R) -> R {
        let mut list = self.class_list();
        let before = list.clone();
        let result = f(&mut list);
        if list != before {
            self.set_attr("class", &list.value());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_case_insensitive() {
        let mut elem = ElementData::new("DIV");
        assert_eq!(elem.local_name, "div");

        elem.set_attr("Data-X", "1");
        assert_eq!(elem.get_attr("data-x"), Some("1"));

        elem.set_attr("DATA-X", "2");
        assert_eq!(elem.attrs.len(), 1);
        assert_eq!(elem.get_attr("data-x"), Some("2"));
    }

    #[test]
    fn test_class_list_writes_back() {
        let mut elem = ElementData::new("p");
        elem.set_attr("id", "intro");

        elem.update_class_list(|list| list.add("lead"));
        assert_eq!(elem.get_attr("class"), Some("lead"));
        // Attribute order follows insertion
        assert_eq!(elem.attrs[0].name, "id");

        elem.update_class_list(|list| list.remove("lead"));
        assert_eq!(elem.get_attr("class"), Some(""));
    }

    #[test]
    fn test_unchanged_class_list_leaves_attribute_alone() {
        let mut elem = ElementData::new("p");
        let present = elem.update_class_list(|list| list.contains("x"));
        assert!(!present);
        assert!(!elem.has_attr("class"));
    }
}
