//! HTML serialization (innerHTML / outerHTML)

use crate::{DomTree, NodeData, NodeId};

/// Elements that never have an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose text children are written verbatim
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Serialize the children of `node`
pub fn inner_html(tree: &DomTree, node: NodeId) -> String {
    let mut out = String::new();
    let raw = tree
        .element(node)
        .is_ok_and(|e| RAW_TEXT_ELEMENTS.contains(&e.local_name.as_str()));
    for (child, _) in tree.children(node) {
        write_node(tree, child, raw, &mut out);
    }
    out
}

/// Serialize `node` itself, including its children
pub fn outer_html(tree: &DomTree, node: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, node, false, &mut out);
    out
}

fn write_node(tree: &DomTree, id: NodeId, raw_parent: bool, out: &mut String) {
    let Some(node) = tree.get(id) else { return };

    match &node.data {
        NodeData::Document => {
            for (child, _) in tree.children(id) {
                write_node(tree, child, false, out);
            }
        }
        NodeData::Doctype { name, .. } => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::Text(text) => {
            if raw_parent {
                out.push_str(text);
            } else {
                escape_into(text, false, out);
            }
        }
        NodeData::Element(elem) => {
            out.push('<');
            out.push_str(&elem.local_name);
            for attr in &elem.attrs {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                escape_into(&attr.value, true, out);
                out.push('"');
            }
            out.push('>');

            let tag = elem.local_name.as_str();
            if VOID_ELEMENTS.contains(&tag) {
                return;
            }
            out.push_str(&inner_html(tree, id));
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}
