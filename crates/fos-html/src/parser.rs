//! HTML5 Parser implementation
//!
//! Parses with html5ever into its RcDom and converts the result into our
//! arena DOM.

use fos_dom::{Document, DomTree, NodeId};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, parse_fragment, LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::ParseError;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// HTML5 parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, ParseError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, ParseError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = Self::read(html)?;

        let mut document = Document::empty(url);
        let root = document.tree().root();
        self.convert_node(&dom.document, document.tree_mut(), root, false);
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Parse `html` with `parent` as the context element and append the
    /// nodes under it.
    ///
    /// Returns the IDs of the top-level nodes that were appended. Parsing in
    /// the element's own context keeps leading whitespace and comments, and
    /// lets table parts (`<td>` inside a `<tr>`) survive.
    pub fn parse_fragment_into(
        &self,
        tree: &mut DomTree,
        parent: NodeId,
        html: &str,
    ) -> Result<Vec<NodeId>, ParseError> {
        let context = tree.element(parent)?.local_name.clone();
        tracing::trace!(%parent, context = %context, "Parsing HTML fragment");

        let dom = Self::read_fragment(html, &context)?;
        let before = tree.children(parent).count();

        // html5ever roots the fragment in a synthetic <html> element
        if let Some(root) = find_child(&dom.document, "html") {
            for child in root.children.borrow().iter() {
                self.convert_node(child, tree, parent, true);
            }
        }

        Ok(tree.children(parent).skip(before).map(|(id, _)| id).collect())
    }

    fn read(html: &str) -> Result<RcDom, ParseError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;
        Ok(dom)
    }

    fn read_fragment(html: &str, context: &str) -> Result<RcDom, ParseError> {
        let context = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(context));
        let dom = parse_fragment(RcDom::default(), Default::default(), context, Vec::new(), false)
            .from_utf8()
            .read_from(&mut html.as_bytes())?;
        Ok(dom)
    }

    /// Convert an RcDom node to our DOM format
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId, keep_whitespace: bool) {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent, keep_whitespace);
                }
            }
            RcNodeData::Doctype { name, public_id, system_id } => {
                let id = tree.create_doctype(name, public_id, system_id);
                tree.append_child(parent, id);
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if keep_whitespace || !text.trim().is_empty() {
                    let id = tree.create_text(&text);
                    tree.append_child(parent, id);
                }
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                tree.append_child(parent, id);
            }
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                if let Ok(elem) = tree.element_mut(id) {
                    for attr in attrs.borrow().iter() {
                        elem.set_attr(&attr.name.local, &attr.value);
                    }
                }
                tree.append_child(parent, id);

                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id, keep_whitespace);
                }
            }
            _ => {
                // Processing instructions have no place in HTML documents
            }
        }
    }
}

fn find_child(handle: &Handle, local: &str) -> Option<Handle> {
    handle
        .children
        .borrow()
        .iter()
        .find(|child| matches!(&child.data, RcNodeData::Element { name, .. } if &*name.local == local))
        .cloned()
}
